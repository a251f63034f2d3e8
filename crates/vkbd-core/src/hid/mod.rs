// Vkbd HID Layer
// Report model and the virtual HID devices built on it

pub mod absolute_mouse;
pub mod consumer_control;
pub mod keyboard;
pub mod mouse;
pub mod report;
pub mod report_consumer;
pub mod system_control;
pub mod usage;

pub use absolute_mouse::AbsoluteMouse;
pub use consumer_control::ConsumerControl;
pub use keyboard::Keyboard;
pub use mouse::{Mouse, MouseButton, MouseButtons};
pub use report::{
    AbsoluteMouseReport, ConsumerControlReport, HidReport, KeyboardReport, MouseReport,
    ReportPair, SendOutcome, SendPolicy, SystemControlReport,
};
pub use report_consumer::{
    describe_keyboard_report, CapturingKeyboardReportConsumer, KeyboardReportConsumer,
    StandardKeyboardReportConsumer,
};
pub use system_control::SystemControl;
