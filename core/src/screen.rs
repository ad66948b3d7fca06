//! Screen state: the selected image and the outcome of the last upload.
//!
//! # Design
//! The host owns one `Screen` and funnels every user action through it.
//! Uploads are split the same way as the client: `begin_upload` flips the
//! state to `InProgress` and hands back a `PendingUpload`, the host loads
//! the image bytes and executes `PendingUpload::request`, and
//! `complete_upload` folds the host's result back in. Reading the image is
//! host I/O like the round-trip itself, so the screen never touches the
//! filesystem.
//!
//! Every begin, and every new selection, advances an epoch. A completion
//! whose ticket is not the latest is dropped, so a slow response can never
//! overwrite the outcome of a newer send or resurrect a result for an image
//! that is no longer selected.

use tracing::{debug, error};

use crate::client::UploadClient;
use crate::echo::EchoVerdict;
use crate::error::UploadError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{ImageDescriptor, UploadVariant};

/// What the result area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    Absent,
    InProgress,
    Succeeded,
    Failed,
    Errored,
}

impl ResponseState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResponseState::Succeeded | ResponseState::Failed | ResponseState::Errored
        )
    }
}

/// Identifies one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    id: u64,
    variant: UploadVariant,
}

impl UploadTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn variant(&self) -> UploadVariant {
        self.variant
    }
}

/// A started upload: the ticket to complete it with and the image whose
/// bytes the host must load.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub ticket: UploadTicket,
    pub image: ImageDescriptor,
    client: UploadClient,
}

impl PendingUpload {
    /// The request to execute once the image bytes are loaded.
    pub fn request(&self, data: Vec<u8>) -> HttpRequest {
        let request = self.client.build_upload(self.ticket.variant, &self.image, data);
        debug!(
            variant = ?self.ticket.variant,
            ticket = self.ticket.id,
            path = %request.path,
            "upload request built"
        );
        request
    }
}

#[derive(Debug, Clone)]
pub struct Screen {
    client: UploadClient,
    image: Option<ImageDescriptor>,
    response: ResponseState,
    epoch: u64,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(UploadClient::default())
    }
}

impl Screen {
    pub fn new(client: UploadClient) -> Self {
        Self {
            client,
            image: None,
            response: ResponseState::Absent,
            epoch: 0,
        }
    }

    pub fn client(&self) -> &UploadClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut UploadClient {
        &mut self.client
    }

    pub fn image(&self) -> Option<&ImageDescriptor> {
        self.image.as_ref()
    }

    pub fn response(&self) -> ResponseState {
        self.response
    }

    /// Replace the selected image and clear the result area.
    pub fn select_image(&mut self, image: ImageDescriptor) {
        debug!(uri = %image.uri, name = %image.name, "image selected");
        self.image = Some(image);
        self.response = ResponseState::Absent;
        self.epoch += 1;
    }

    /// Start an upload of the selected image.
    ///
    /// Without a selection this fails with `NoImage` and leaves the state
    /// alone. Otherwise the state is `InProgress` on return.
    pub fn begin_upload(&mut self, variant: UploadVariant) -> Result<PendingUpload, UploadError> {
        let image = self.image.clone().ok_or(UploadError::NoImage)?;
        self.epoch += 1;
        self.response = ResponseState::InProgress;
        let ticket = UploadTicket {
            id: self.epoch,
            variant,
        };
        debug!(variant = ?variant, ticket = ticket.id, uri = %image.uri, "upload started");
        Ok(PendingUpload {
            ticket,
            image,
            client: self.client.clone(),
        })
    }

    /// True when `ticket` belongs to the most recent begin or selection.
    pub fn is_current(&self, ticket: &UploadTicket) -> bool {
        ticket.id == self.epoch
    }

    /// Apply the host's result for `ticket`.
    ///
    /// Returns the new state, or `None` when the ticket is stale and the
    /// result was discarded.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<HttpResponse, UploadError>,
    ) -> Option<ResponseState> {
        if !self.is_current(&ticket) {
            debug!(
                ticket = ticket.id,
                current = self.epoch,
                "discarding stale upload result"
            );
            return None;
        }

        let variant = ticket.variant;
        let outcome = result.and_then(|response| self.client.parse_upload(variant, &response));
        self.response = match outcome {
            Ok(EchoVerdict::Sent) => ResponseState::Succeeded,
            Ok(EchoVerdict::NotSent) => ResponseState::Failed,
            Err(e) => {
                error!(variant = ?variant, error = %e, "request errored");
                ResponseState::Errored
            }
        };
        Some(self.response)
    }
}
