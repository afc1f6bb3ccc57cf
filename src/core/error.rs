//! Error types for the UAVTalk protocol.

use thiserror::Error;

use super::traits::ObjectId;

/// Errors reported by an [`ObjectStore`](super::traits::ObjectStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// No object with this id exists in the dictionary.
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),

    /// The object exists but the instance does not and cannot be created.
    #[error("unknown instance {inst_id} of object {obj_id}")]
    UnknownInstance {
        /// Object id.
        obj_id: ObjectId,
        /// Offending instance id.
        inst_id: u16,
    },

    /// Buffer length does not match the object's serialized size.
    #[error("object size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Serialized size declared by the dictionary.
        expected: usize,
        /// Bytes offered.
        actual: usize,
    },
}

/// The output sink refused the write (link saturated or torn down).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("output sink rejected the write")]
pub struct OutputError;

/// Errors that can occur when building and sending a frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Payload would exceed the fixed frame limit.
    #[error("payload too large: {size} bytes, limit {limit}")]
    PayloadTooLarge {
        /// Requested payload size.
        size: usize,
        /// Protocol limit.
        limit: usize,
    },

    /// This packet kind cannot address all instances at once.
    #[error("packet kind cannot address all instances")]
    AllInstancesNotAllowed,

    /// Dictionary failure while packing the object.
    #[error("object store error: {0}")]
    Object(#[from] ObjectError),

    /// The output sink accepted fewer bytes than the frame length.
    #[error("short write: sink accepted {accepted} of {expected} bytes")]
    ShortWrite {
        /// Bytes the sink accepted.
        accepted: usize,
        /// Complete frame length.
        expected: usize,
    },

    /// The output sink returned an error.
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Errors that can occur when dispatching a completed frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReceiveError {
    /// No completed frame is pending in the parser.
    #[error("no completed frame pending")]
    NotComplete,

    /// Object updates must address a concrete instance.
    #[error("object update addressed to all instances")]
    AllInstancesNotAllowed,

    /// Dictionary failure while unpacking the object.
    #[error("object store error: {0}")]
    Object(#[from] ObjectError),

    /// A file-data frame shorter than its record header.
    #[error("malformed file-data frame")]
    MalformedFileData,
}

/// Errors that can occur when relaying a frame between two connections.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The source parser has not completed a frame.
    #[error("source frame not complete")]
    SourceNotComplete,

    /// The source parser was not driven in relay mode, so no raw bytes
    /// were captured.
    #[error("no raw frame captured on source connection")]
    NoRawFrame,

    /// The destination sink accepted fewer bytes than the frame length.
    #[error("short relay write: sink accepted {accepted} of {expected} bytes")]
    ShortWrite {
        /// Bytes the sink accepted.
        accepted: usize,
        /// Complete frame length.
        expected: usize,
    },

    /// The destination sink returned an error.
    #[error(transparent)]
    Output(#[from] OutputError),
}
