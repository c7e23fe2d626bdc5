//! Element types and raw-buffer decoding for the upload/readback path.
//!
//! Every element type has a fixed width in a GPU buffer. `bool` and
//! `string` payloads are stored packed as 32-bit integers, so reading them
//! back narrows each integer to a byte rather than reinterpreting the bytes.

use std::borrow::Cow;
use std::str::FromStr;

use rayon::prelude::*;

use crate::error::{DispatchError, Result};

/// Above this many elements, bool/string narrowing runs on the rayon pool.
const PARALLEL_NARROW_THRESHOLD: usize = 1 << 16;

/// Element types a GPU tensor buffer can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 32-bit IEEE float.
    Float32,
    /// 32-bit signed integer.
    Int32,
    /// Boolean, stored as a 32-bit integer.
    Bool,
    /// String handle, stored as a 32-bit integer.
    String,
    /// Pair of 32-bit floats.
    Complex64,
}

impl ElementType {
    /// Tag used for this type in dtype strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Int32 => "int32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Complex64 => "complex64",
        }
    }

    /// Bytes one element occupies in a GPU buffer.
    #[must_use]
    pub const fn byte_width(self) -> usize {
        match self {
            Self::Float32 | Self::Int32 | Self::Bool | Self::String => 4,
            Self::Complex64 => 8,
        }
    }
}

impl FromStr for ElementType {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "float32" => Ok(Self::Float32),
            "int32" => Ok(Self::Int32),
            "bool" => Ok(Self::Bool),
            "string" => Ok(Self::String),
            "complex64" => Ok(Self::Complex64),
            other => Err(DispatchError::UnknownElementType(other.to_owned())),
        }
    }
}

impl core::fmt::Display for ElementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte width for a dtype tag.
///
/// # Errors
///
/// [`DispatchError::UnknownElementType`] if `tag` names no element type.
pub fn byte_width(tag: &str) -> Result<usize> {
    Ok(tag.parse::<ElementType>()?.byte_width())
}

/// A raw buffer viewed as typed elements.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedView<'a> {
    /// `float32` data.
    Float32(Cow<'a, [f32]>),
    /// `int32` data.
    Int32(Cow<'a, [i32]>),
    /// `bool` or `string` data narrowed to one byte per element.
    Uint8(Vec<u8>),
}

impl TypedView<'_> {
    /// Number of elements in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float32(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Uint8(v) => v.len(),
        }
    }

    /// `true` if the view has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if the view shares storage with the buffer it was read from.
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(
            self,
            Self::Float32(Cow::Borrowed(_)) | Self::Int32(Cow::Borrowed(_))
        )
    }
}

/// Views `raw` as `T`, borrowing when the buffer is suitably aligned and
/// copying when it is not.
fn cast_or_copy<T: bytemuck::Pod>(raw: &[u8]) -> Result<Cow<'_, [T]>> {
    let width = size_of::<T>();
    if raw.len() % width != 0 {
        return Err(DispatchError::BufferLength {
            len: raw.len(),
            width,
        });
    }

    Ok(match bytemuck::try_cast_slice(raw) {
        Ok(view) => Cow::Borrowed(view),
        Err(_) => Cow::Owned(bytemuck::allocation::pod_collect_to_vec(raw)),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn narrow_to_u8(ints: &[i32]) -> Vec<u8> {
    if ints.len() >= PARALLEL_NARROW_THRESHOLD {
        ints.par_iter().map(|&v| v as u8).collect()
    } else {
        ints.iter().map(|&v| v as u8).collect()
    }
}

/// Reinterprets a raw GPU buffer as typed elements.
///
/// - `float32` and `int32` view the bytes directly. The view borrows `raw`
///   when it is 4-byte aligned and is copied otherwise.
/// - `bool` and `string` read the bytes as 32-bit integers and truncate each
///   one to a `u8`. This always copies.
///
/// # Errors
///
/// - [`DispatchError::UnknownElementType`] for `complex64`, which has no
///   typed view
/// - [`DispatchError::BufferLength`] if `raw` is not a whole number of
///   32-bit words
pub fn reinterpret_buffer(raw: &[u8], element_type: ElementType) -> Result<TypedView<'_>> {
    match element_type {
        ElementType::Float32 => Ok(TypedView::Float32(cast_or_copy(raw)?)),
        ElementType::Int32 => Ok(TypedView::Int32(cast_or_copy(raw)?)),
        ElementType::Bool | ElementType::String => {
            let ints = cast_or_copy::<i32>(raw)?;
            Ok(TypedView::Uint8(narrow_to_u8(&ints)))
        }
        ElementType::Complex64 => Err(DispatchError::UnknownElementType(
            element_type.as_str().to_owned(),
        )),
    }
}

/// [`reinterpret_buffer`] for a dtype tag.
///
/// # Errors
///
/// [`DispatchError::UnknownElementType`] if `tag` names no element type,
/// otherwise as [`reinterpret_buffer`].
pub fn reinterpret_buffer_tagged<'a>(raw: &'a [u8], tag: &str) -> Result<TypedView<'a>> {
    reinterpret_buffer(raw, tag.parse()?)
}
