//! The tic module contains the components responsible for the teleinformation protocol:
//! frame acquisition from the serial link, group decoding and checksum validation, and the
//! per-tag change detection.

pub mod fields;
pub mod frame;
pub mod reader;
pub mod registry;
pub mod serial;
pub mod serial_mock;

pub use fields::{historic_single_phase_fields, FieldDescriptor, HomieDatatype};
pub use frame::{calculate_checksum, validate, verify_group, GroupDecoder, TicFrame, TicGroup};
pub use reader::{ByteSource, FrameReader};
pub use registry::{Detection, FieldUpdate, TagRegistry, TagSlot};
pub use serial::SerialLink;
