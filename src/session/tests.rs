// Copyright (C) 2025 Joshua Kesler
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use super::*;
use crate::notice::Severity;
use crossbeam_channel::{bounded, unbounded};
use std::path::PathBuf;

struct Harness {
    session: Session,
    cam_cmds: Receiver<CameraCommand>,
    cam_msgs: Sender<CameraMessage>,
    frames: Sender<CameraFrame>,
    img_cmds: Receiver<ImagingCommand>,
    img_replies: Sender<ImagingReply>,
}

fn harness() -> Harness {
    let (cam_cmd_tx, cam_cmds) = unbounded();
    let (cam_msgs, cam_msg_rx) = unbounded();
    let (frames, frame_rx) = bounded(1);
    let (img_cmd_tx, img_cmds) = unbounded();
    let (img_replies, img_reply_rx) = unbounded();
    let session = Session::new(cam_cmd_tx, cam_msg_rx, frame_rx, img_cmd_tx, img_reply_rx, I18n::new(Some("en-US")), Duration::from_secs(3));
    Harness { session, cam_cmds, cam_msgs, frames, img_cmds, img_replies }
}

impl Harness {
    fn poll(&mut self) {
        self.session.poll(Instant::now());
    }

    /// Issues a start and returns the serial the worker was given.
    fn start(&mut self) -> u64 {
        self.session.start_camera();
        match self.cam_cmds.try_recv().unwrap() {
            CameraCommand::Start { serial } => serial,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn go_live(&mut self) -> u64 {
        let serial = self.start();
        self.cam_msgs.send(CameraMessage::Started { serial, width: 4, height: 3 }).unwrap();
        self.poll();
        assert_eq!(self.session.view(), View::LiveCamera);
        serial
    }

    fn send_frame(&mut self, serial: u64) {
        let mut pixels = RgbImage::new(4, 3);
        pixels.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        self.frames.send(CameraFrame { serial, image: Arc::new(pixels) }).unwrap();
        self.poll();
    }

    fn load(&mut self, image: &EncodedImage) {
        let mut picker = ScriptedPicker::opening("photo.jpg");
        self.session.load_image(&mut picker);
        match self.img_cmds.try_recv().unwrap() {
            ImagingCommand::Load { path } => assert_eq!(path, PathBuf::from("photo.jpg")),
            other => panic!("unexpected command: {:?}", other),
        }
        self.img_replies.send(ImagingReply::Loaded { path: "photo.jpg".into(), image: image.clone() }).unwrap();
        self.poll();
    }

    fn notice(&self) -> (String, Severity) {
        let n = self.session.notices().last().expect("a notice");
        (n.text.clone(), n.severity)
    }
}

#[derive(Default)]
struct ScriptedPicker {
    open: Option<PathBuf>,
    save: Option<PathBuf>,
    open_calls: usize,
    save_calls: usize,
}

impl ScriptedPicker {
    fn opening(path: &str) -> Self {
        Self { open: Some(path.into()), ..Default::default() }
    }

    fn saving(path: &str) -> Self {
        Self { save: Some(path.into()), ..Default::default() }
    }
}

impl FilePicker for ScriptedPicker {
    fn pick_image(&mut self) -> Option<PathBuf> {
        self.open_calls += 1;
        self.open.clone()
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        self.save_calls += 1;
        self.save.clone()
    }
}

fn jpeg_payload() -> EncodedImage {
    EncodedImage::from_bytes("image/jpeg", b"\xff\xd8\xff-jpeg-bytes")
}

#[test]
fn starts_empty_with_ready_notice() {
    let h = harness();
    assert_eq!(h.session.view(), View::Empty);
    assert!(h.session.current_image().is_none());
    assert_eq!(h.notice(), ("Ready".to_string(), Severity::Info));
}

#[test]
fn start_then_stop_returns_to_empty() {
    let mut h = harness();
    let serial = h.go_live();
    h.send_frame(serial);
    assert!(h.session.latest_frame().is_some());

    h.session.stop_camera();
    assert_eq!(h.cam_cmds.try_recv().unwrap(), CameraCommand::Stop);
    assert_eq!(h.session.view(), View::Empty);
    assert!(!h.session.is_camera_live());
    assert!(h.session.latest_frame().is_none());
    assert_eq!(h.notice().0, "Camera stopped");
}

#[test]
fn stop_without_camera_does_nothing() {
    let mut h = harness();
    h.session.stop_camera();
    assert!(h.cam_cmds.try_recv().is_err());
    assert_eq!(h.session.view(), View::Empty);
}

#[test]
fn permission_denied_leaves_state_untouched() {
    let mut h = harness();
    let serial = h.start();
    assert_eq!(h.session.pending(), Some(Pending::StartCamera));

    h.cam_msgs.send(CameraMessage::Failed { serial, failure: CameraFailure::PermissionDenied }).unwrap();
    h.poll();

    assert_eq!(h.session.view(), View::Empty);
    assert!(!h.session.is_camera_live());
    assert_eq!(h.session.pending(), None);
    let (text, severity) = h.notice();
    assert_eq!(severity, Severity::Error);
    assert!(text.contains("denied"), "{text}");
}

#[test]
fn unclassified_camera_failure_shows_detail() {
    let mut h = harness();
    let serial = h.start();
    h.cam_msgs.send(CameraMessage::Failed { serial, failure: CameraFailure::Other("driver exploded".into()) }).unwrap();
    h.poll();
    assert_eq!(h.notice().0, "Camera access error: driver exploded");
}

#[test]
fn capture_switches_to_still_image_and_stops_camera() {
    let mut h = harness();
    let serial = h.go_live();
    h.send_frame(serial);

    h.session.capture_photo();

    assert_eq!(h.session.view(), View::StillImage);
    assert!(!h.session.is_camera_live());
    assert_eq!(h.cam_cmds.try_recv().unwrap(), CameraCommand::Stop);

    let image = h.session.current_image().unwrap();
    assert_eq!(image.mime(), Some("image/png"));
    let decoded = image::load_from_memory(&image.decode().unwrap()).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (4, 3));
    assert_eq!(decoded.get_pixel(0, 0), &image::Rgb([255, 0, 0]));
    assert_eq!(h.notice(), ("Photo captured".to_string(), Severity::Info));
}

#[test]
fn capture_before_first_frame_keeps_camera_running() {
    let mut h = harness();
    h.go_live();

    h.session.capture_photo();

    assert_eq!(h.session.view(), View::LiveCamera);
    assert!(h.session.is_camera_live());
    assert!(h.session.current_image().is_none());
    assert!(h.cam_cmds.try_recv().is_err());
    assert_eq!(h.notice().1, Severity::Error);
}

#[test]
fn capture_without_camera_is_an_error() {
    let mut h = harness();
    h.session.capture_photo();
    assert_eq!(h.notice(), ("The camera is not running".to_string(), Severity::Error));
    assert_eq!(h.session.view(), View::Empty);
}

#[test]
fn save_and_resize_need_an_image() {
    let mut h = harness();
    let mut picker = ScriptedPicker::saving("out.png");

    h.session.save_image(&mut picker);
    assert_eq!(picker.save_calls, 0);
    assert_eq!(h.notice(), ("There is no image to save".to_string(), Severity::Error));

    h.session.resize_image("800", "600");
    assert_eq!(h.notice(), ("There is no image to resize".to_string(), Severity::Error));

    assert!(h.img_cmds.try_recv().is_err());
}

#[test]
fn resize_rejects_bad_dimensions() {
    let mut h = harness();
    h.load(&jpeg_payload());

    for (w, h_in) in [("", "600"), ("800", ""), ("0", "600"), ("800", "0"), ("-5", "600"), ("abc", "10")] {
        h.session.resize_image(w, h_in);
        assert!(h.img_cmds.try_recv().is_err(), "{w}x{h_in}");
        assert_eq!(h.notice(), ("Enter a valid width and height".to_string(), Severity::Error));
    }
    assert_eq!(h.session.current_image(), Some(&jpeg_payload()));
}

#[test]
fn load_then_save_passes_payload_through_unchanged() {
    let mut h = harness();
    let payload = jpeg_payload();
    h.load(&payload);
    assert_eq!(h.session.view(), View::StillImage);
    assert_eq!(h.notice().0, "Image loaded");

    let mut picker = ScriptedPicker::saving("/tmp/out.png");
    h.session.save_image(&mut picker);
    match h.img_cmds.try_recv().unwrap() {
        ImagingCommand::Save { image, path } => {
            assert_eq!(image, payload);
            assert_eq!(path, PathBuf::from("/tmp/out.png"));
        },
        other => panic!("unexpected command: {:?}", other),
    }

    h.img_replies.send(ImagingReply::Saved { path: "/tmp/out.png".into() }).unwrap();
    h.poll();
    assert_eq!(h.notice(), ("Image saved to /tmp/out.png".to_string(), Severity::Info));
    assert_eq!(h.session.pending(), None);
}

#[test]
fn load_then_resize_replaces_current_image() {
    let mut h = harness();
    let payload = jpeg_payload();
    h.load(&payload);
    let serial = h.session.image_serial();

    h.session.resize_image("800", " 600 ");
    match h.img_cmds.try_recv().unwrap() {
        ImagingCommand::Resize { image, width, height } => {
            assert_eq!(image, payload);
            assert_eq!((width, height), (800, 600));
        },
        other => panic!("unexpected command: {:?}", other),
    }

    let resized = EncodedImage::from_bytes("image/png", b"resized");
    h.img_replies.send(ImagingReply::Resized { image: resized.clone(), width: 800, height: 600 }).unwrap();
    h.poll();

    assert_eq!(h.session.current_image(), Some(&resized));
    assert_eq!(h.session.view(), View::StillImage);
    assert!(h.session.image_serial() > serial);
    assert_eq!(h.notice().0, "Image resized to 800x600");
}

#[test]
fn cancelled_dialogs_are_silent() {
    let mut h = harness();
    let serial = h.go_live();
    h.send_frame(serial);
    h.session.capture_photo();
    let _ = h.cam_cmds.try_recv();

    let mut picker = ScriptedPicker::default();
    h.session.save_image(&mut picker);
    assert_eq!(picker.save_calls, 1);

    h.session.load_image(&mut picker);
    assert_eq!(picker.open_calls, 1);

    assert!(h.img_cmds.try_recv().is_err());
    assert_eq!(h.session.pending(), None);
    assert_eq!(h.notice(), ("Photo captured".to_string(), Severity::Info));
    assert_eq!(h.session.view(), View::StillImage);
}

#[test]
fn second_request_while_busy_is_refused() {
    let mut h = harness();
    let mut picker = ScriptedPicker::opening("a.png");
    h.session.load_image(&mut picker);
    assert!(h.img_cmds.try_recv().is_ok());
    assert_eq!(h.session.pending(), Some(Pending::Load));

    h.session.load_image(&mut picker);
    assert_eq!(picker.open_calls, 1);
    h.session.start_camera();
    assert!(h.cam_cmds.try_recv().is_err());
    assert!(h.img_cmds.try_recv().is_err());
    assert_eq!(h.notice().0, "Please wait, another operation is still running");
}

#[test]
fn stop_cancels_a_pending_start() {
    let mut h = harness();
    let serial = h.start();

    h.session.stop_camera();
    assert_eq!(h.cam_cmds.try_recv().unwrap(), CameraCommand::Stop);
    assert_eq!(h.session.pending(), None);
    assert_eq!(h.session.view(), View::Empty);
    assert_eq!(h.notice(), ("Camera stopped".to_string(), Severity::Info));

    // the worker finished opening before it saw the stop
    h.cam_msgs.send(CameraMessage::Started { serial, width: 4, height: 3 }).unwrap();
    h.frames.send(CameraFrame { serial, image: Arc::new(RgbImage::new(4, 3)) }).unwrap();
    h.cam_msgs.send(CameraMessage::Stopped { serial }).unwrap();
    h.poll();

    assert!(h.cam_cmds.try_recv().is_err());
    assert_eq!(h.session.view(), View::Empty);
    assert!(!h.session.is_camera_live());
    assert!(h.session.latest_frame().is_none());
}

#[test]
fn failure_of_a_cancelled_start_is_not_reported() {
    let mut h = harness();
    let serial = h.start();
    h.session.stop_camera();

    h.cam_msgs.send(CameraMessage::Failed { serial, failure: CameraFailure::DeviceBusy }).unwrap();
    h.poll();

    assert_eq!(h.notice(), ("Camera stopped".to_string(), Severity::Info));
    assert_eq!(h.session.view(), View::Empty);
}

#[test]
fn restart_after_cancel_ignores_replies_for_the_old_start() {
    let mut h = harness();
    let first = h.start();
    h.session.stop_camera();
    assert_eq!(h.cam_cmds.try_recv().unwrap(), CameraCommand::Stop);
    let second = h.start();
    assert_ne!(first, second);

    // worker: opens for the first start, sees the stop, then opens again
    h.cam_msgs.send(CameraMessage::Started { serial: first, width: 4, height: 3 }).unwrap();
    h.poll();
    assert!(!h.session.is_camera_live());
    assert_eq!(h.session.pending(), Some(Pending::StartCamera));

    h.cam_msgs.send(CameraMessage::Stopped { serial: first }).unwrap();
    h.cam_msgs.send(CameraMessage::Started { serial: second, width: 8, height: 6 }).unwrap();
    h.poll();

    assert_eq!(h.session.view(), View::LiveCamera);
    assert_eq!(h.session.pending(), None);
    assert_eq!(h.session.camera().map(|c| (c.width, c.height)), Some((8, 6)));
    assert!(h.cam_cmds.try_recv().is_err());

    h.send_frame(first);
    assert!(h.session.latest_frame().is_none());
    h.send_frame(second);
    assert!(h.session.latest_frame().is_some());
}

#[test]
fn unrequested_stop_ends_the_session() {
    let mut h = harness();
    let serial = h.go_live();
    h.cam_msgs.send(CameraMessage::Stopped { serial }).unwrap();
    h.poll();

    assert_eq!(h.session.view(), View::Empty);
    assert!(!h.session.is_camera_live());
}

#[test]
fn lost_stream_returns_to_empty() {
    let mut h = harness();
    let serial = h.go_live();
    h.cam_msgs.send(CameraMessage::Lost { serial, detail: "device unplugged".into() }).unwrap();
    h.poll();

    assert_eq!(h.session.view(), View::Empty);
    assert!(!h.session.is_camera_live());
    assert_eq!(h.notice().0, "The camera stream stopped unexpectedly: device unplugged");
}

#[test]
fn service_errors_are_shown_verbatim() {
    let mut h = harness();
    let mut picker = ScriptedPicker::opening("missing.png");
    h.session.load_image(&mut picker);
    let _ = h.img_cmds.try_recv();

    h.img_replies.send(ImagingReply::Failed { op: ImagingOp::Load, message: "No such file or directory (os error 2)".into() }).unwrap();
    h.poll();

    assert_eq!(h.session.view(), View::Empty);
    assert!(h.session.current_image().is_none());
    assert_eq!(h.session.pending(), None);
    assert_eq!(
        h.notice(),
        ("Could not load the image: No such file or directory (os error 2)".to_string(), Severity::Error)
    );
}

#[test]
fn dropping_the_session_stops_the_camera() {
    let mut h = harness();
    h.go_live();
    let cmds = h.cam_cmds.clone();
    drop(h);
    assert_eq!(cmds.try_recv().unwrap(), CameraCommand::Stop);
}

#[test]
fn dimensions_must_be_positive_integers() {
    assert_eq!(parse_dimensions("800", "600"), Ok((800, 600)));
    assert_eq!(parse_dimensions(" 1 ", "1"), Ok((1, 1)));
    assert_eq!(parse_dimensions("0", "600"), Err(DimensionError));
    assert_eq!(parse_dimensions("-1", "600"), Err(DimensionError));
    assert_eq!(parse_dimensions("12.5", "600"), Err(DimensionError));
    assert_eq!(parse_dimensions("800", ""), Err(DimensionError));
}
