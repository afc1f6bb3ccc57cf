//! Collaborator traits for the UAVTalk codec.
//!
//! The codec itself never owns object layouts or transports. It reaches the
//! outside world through exactly two seams: [`ObjectStore`] (the UAV Object
//! dictionary) and [`ConnectionHandler`] (output sink plus notification
//! callbacks). Both are registered once when the connection is created.

use std::fmt;

use super::error::{ObjectError, OutputError};

/// 32-bit identifier of a UAV Object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Create an object id from its raw wire value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw wire value (little endian on the wire).
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl From<u32> for ObjectId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Dictionary metadata the codec needs to frame an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Serialized size of one instance, in bytes.
    pub size: usize,
    /// Whether the object is declared single-instance. Single-instance
    /// objects omit the instance id field on the wire.
    pub single_instance: bool,
    /// Number of instances currently registered. Single-instance objects
    /// report 1.
    pub num_instances: u16,
}

/// The UAV Object dictionary, as seen by the codec.
///
/// The codec only ever addresses the store by object id and instance id;
/// field layout, metadata, and change notification stay behind this trait.
pub trait ObjectStore {
    /// Look up framing metadata for an object, or `None` if the id is not
    /// in the dictionary.
    fn lookup(&self, obj_id: ObjectId) -> Option<ObjectInfo>;

    /// Serialize the current value of `obj_id`/`inst_id` into `buf`.
    ///
    /// `buf` is at least [`ObjectInfo::size`] bytes. Returns the number of
    /// bytes written.
    fn pack(&self, obj_id: ObjectId, inst_id: u16, buf: &mut [u8]) -> Result<usize, ObjectError>;

    /// Deserialize `data` into `obj_id`/`inst_id` and notify subscribers.
    ///
    /// Implementations may create the instance if it does not exist yet.
    fn unpack(&mut self, obj_id: ObjectId, inst_id: u16, data: &[u8]) -> Result<(), ObjectError>;
}

/// A dictionary that knows no objects.
///
/// Useful for pure relays, which validate and forward frames without ever
/// unpacking a payload.
impl ObjectStore for () {
    fn lookup(&self, _obj_id: ObjectId) -> Option<ObjectInfo> {
        None
    }

    fn pack(&self, obj_id: ObjectId, _inst_id: u16, _buf: &mut [u8]) -> Result<usize, ObjectError> {
        Err(ObjectError::UnknownObject(obj_id))
    }

    fn unpack(&mut self, obj_id: ObjectId, _inst_id: u16, _data: &[u8]) -> Result<(), ObjectError> {
        Err(ObjectError::UnknownObject(obj_id))
    }
}

/// Per-connection callbacks, registered once at initialization.
///
/// Only [`output`](ConnectionHandler::output) is mandatory; every
/// notification callback defaults to a no-op so handlers implement just
/// what they care about.
pub trait ConnectionHandler {
    /// Hand a complete frame to the byte transport.
    ///
    /// Returns the number of bytes the transport accepted. Accepting fewer
    /// bytes than offered is treated as a transmit error by the caller;
    /// chunking across the physical link is the transport's concern.
    fn output(&mut self, data: &[u8]) -> Result<usize, OutputError>;

    /// An ack or nack frame for `obj_id`/`inst_id` completed on this link.
    fn ack_received(&mut self, obj_id: ObjectId, inst_id: u16) {
        let _ = (obj_id, inst_id);
    }

    /// A peer requested `obj_id`/`inst_id`. The telemetry scheduler decides
    /// whether to answer with the object or a nack.
    fn request_received(&mut self, obj_id: ObjectId, inst_id: u16) {
        let _ = (obj_id, inst_id);
    }

    /// Provide file bytes for an in-progress file transfer.
    ///
    /// Called while serving a peer's file request. `buf` is the chunk
    /// destination; the return value is how many bytes were produced, with
    /// `0` meaning end of file.
    fn file_read(&mut self, buf: &mut [u8], file_id: u32, offset: u32) -> usize {
        let _ = (buf, file_id, offset);
        0
    }

    /// A file-data chunk arrived on this link.
    ///
    /// Fire-and-forget from the codec's point of view; flow control is the
    /// file-transfer layer's concern.
    fn file_received(&mut self, file_id: u32, offset: u32, data: &[u8], eof: bool, last: bool) {
        let _ = (file_id, offset, data, eof, last);
    }
}
