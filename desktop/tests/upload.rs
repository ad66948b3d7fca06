//! Desktop host against the mock echo server: pick from a real file, crop,
//! send through both ureq transports.

use image::GenericImageView;
use parking_lot::Mutex;
use upload_core::{
    pick_image, run_upload, PickerOptions, PinningOptions, ResponseState, Screen, UploadClient,
    UploadVariant,
};
use upload_desktop::{render, FileSource, PathPicker, PinnedTransport, PlainTransport};

fn start_mock_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

/// A 640x360 PNG with a gradient so the encoder has something to do.
fn png_fixture(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("landscape.png");
    let img = image::RgbImage::from_fn(640, 360, |x, y| image::Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    img.save(&path).unwrap();
    path
}

fn screen_for(endpoint: String, picker: &PathPicker) -> Mutex<Screen> {
    let mut screen = Screen::new(UploadClient::new(&endpoint));
    let image = pick_image(picker).unwrap().unwrap();
    screen.select_image(image);
    Mutex::new(screen)
}

#[test]
fn cropping_picker_writes_300x400_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let source = png_fixture(&dir);
    let picker = PathPicker::new(Some(source)).with_output_dir(dir.path());

    let image = pick_image(&picker).unwrap().unwrap();
    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.name, "IMAGEO1.JPG");

    let cropped = image::open(image.local_path()).unwrap();
    let options = PickerOptions::default();
    assert_eq!(cropped.dimensions(), (options.width, options.height));
}

#[test]
fn uncropped_picker_sniffs_type_and_keeps_name() {
    let dir = tempfile::tempdir().unwrap();
    let source = png_fixture(&dir);
    let picker = PathPicker::new(Some(source.clone())).without_cropping();

    let image = pick_image(&picker).unwrap().unwrap();
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.name, "landscape.png");
    assert_eq!(image.local_path(), source);
}

#[test]
fn both_clients_succeed_against_echo() {
    let addr = start_mock_server();
    let dir = tempfile::tempdir().unwrap();
    let picker = PathPicker::new(Some(png_fixture(&dir))).with_output_dir(dir.path());
    let screen = screen_for(format!("http://{addr}/request"), &picker);

    let plain = PlainTransport::new();
    let state = run_upload(&screen, &FileSource, &plain, UploadVariant::Plain).unwrap();
    assert_eq!(state, Some(ResponseState::Succeeded));

    let pinned = PinnedTransport::new(&PinningOptions::default()).unwrap();
    let state = run_upload(&screen, &FileSource, &pinned, UploadVariant::Pinned).unwrap();
    assert_eq!(state, Some(ResponseState::Succeeded));

    let text = render(&screen.lock().view());
    assert!(text.contains("[ok] File was sent!"));
}

#[test]
fn concurrent_sends_settle_on_a_terminal_state() {
    let addr = start_mock_server();
    let dir = tempfile::tempdir().unwrap();
    let picker = PathPicker::new(Some(png_fixture(&dir))).with_output_dir(dir.path());
    let screen = screen_for(format!("http://{addr}/request"), &picker);

    let plain = PlainTransport::new();
    let pinned = PinnedTransport::new(&PinningOptions::default()).unwrap();
    std::thread::scope(|s| {
        s.spawn(|| run_upload(&screen, &FileSource, &plain, UploadVariant::Plain).unwrap());
        s.spawn(|| run_upload(&screen, &FileSource, &pinned, UploadVariant::Pinned).unwrap());
    });

    assert_eq!(screen.lock().response(), ResponseState::Succeeded);
}

#[test]
fn rejected_pinned_send_errors() {
    let addr = start_mock_server();
    let dir = tempfile::tempdir().unwrap();
    let picker = PathPicker::new(Some(png_fixture(&dir))).with_output_dir(dir.path());
    let screen = screen_for(format!("http://{addr}/request"), &picker);

    let pinned = PinnedTransport::new(&PinningOptions {
        disable_all_security: false,
        pk_pinning: true,
        certs: Vec::new(),
    })
    .unwrap();
    let state = run_upload(&screen, &FileSource, &pinned, UploadVariant::Pinned).unwrap();
    assert_eq!(state, Some(ResponseState::Errored));

    let text = render(&screen.lock().view());
    assert!(text.contains("[!!] Request errored!"));
}

#[test]
fn error_status_errors_plain_send() {
    let addr = start_mock_server();
    let dir = tempfile::tempdir().unwrap();
    let picker = PathPicker::new(Some(png_fixture(&dir))).with_output_dir(dir.path());
    let screen = screen_for(format!("http://{addr}/status/500"), &picker);

    let state = run_upload(&screen, &FileSource, &PlainTransport::new(), UploadVariant::Plain).unwrap();
    assert_eq!(state, Some(ResponseState::Errored));
}
