//! Bitstream encoding errors.

use silk_device::PartId;

/// An internal invariant violated during encoding or decoding, or a failed
/// image write. Fatal and treated as a defect (or, for I/O, as an
/// environment failure); no partial output survives.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// The run configuration and the device graph disagree on the part.
    #[error("configuration targets {config} but the device graph models {graph}")]
    PartMismatch {
        /// Part from the run configuration.
        config: PartId,
        /// Part the device graph was built for.
        graph: PartId,
    },

    /// A cell reached the encoder without a placement.
    #[error("cell {cell:?} is unplaced; encoding requires a frozen, complete assignment")]
    UnplacedCell {
        /// The unplaced cell's name.
        cell: String,
    },

    /// The part's resource field windows do not fit the image.
    #[error("field layout needs {needed} bits but the image holds {available}")]
    LayoutOverflow {
        /// Bits required by the layout.
        needed: usize,
        /// Bits available before the metadata window.
        available: usize,
    },

    /// A field value does not fit its fixed bit width.
    #[error("{location}: field {field} value {value} does not fit {width} bits")]
    FieldOverflow {
        /// The resource instance being encoded.
        location: String,
        /// The field name.
        field: String,
        /// The value that overflowed.
        value: u64,
        /// The field's width in bits.
        width: usize,
    },

    /// A field read back from an image holds an undefined encoding.
    #[error("{location}: field {field} holds an undefined encoding")]
    InvalidFieldEncoding {
        /// The resource instance being decoded.
        location: String,
        /// The field name.
        field: String,
    },

    /// The image byte length does not match the part.
    #[error("image is {found} bytes but {part} images are {expected} bytes")]
    ImageLength {
        /// The part being decoded for.
        part: PartId,
        /// Expected byte count.
        expected: usize,
        /// Found byte count.
        found: usize,
    },

    /// Writing the image file failed. Any partially written file is removed.
    #[error("failed to write bitstream file: {0}")]
    Io(#[from] std::io::Error),
}
