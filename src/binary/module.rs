use nom::{
    bytes::complete::take, error::ParseError as _, multi::many0, number::complete::le_u8,
    sequence::pair, IResult,
};
use nom_leb128::{leb128_u32, leb128_u64};
use num_traits::FromPrimitive;
use tracing::trace;

use crate::binary::{
    error::DecodeError,
    section::SectionCode,
    types::{
        FuncType, GlobalType, Import, ImportDesc, IndexType, Limits, RefType, TableType, ValueType,
    },
};

const WASM_MAGIC: &[u8] = b"\0asm";
const WASM_VERSION: &[u8] = &[0x01, 0x00, 0x00, 0x00];

const FUNC_TYPE_FORM: u8 = 0x60;

const LIMITS_HAS_MAX: u8 = 0b001;
const LIMITS_SHARED: u8 = 0b010;
const LIMITS_INDEX64: u8 = 0b100;

type DecodeResult<'a, T> = IResult<&'a [u8], T, DecodeError>;

/// Decodes the import section of a binary wasm module, resolving function
/// imports against the type section that precedes it.
///
/// Only the header, the type section and the import section are ever
/// interpreted. Everything else is skipped by its declared size, and nothing
/// past the import section is read at all. A module without an import
/// section decodes to an empty list.
///
/// Accepts anything that dereferences to the module bytes; a vector, a
/// slice, or a borrowed view over the same bytes all decode identically.
#[tracing::instrument(level = "trace", skip_all)]
pub fn parse_imports(wasm: impl AsRef<[u8]>) -> Result<Vec<Import>, DecodeError> {
    match decode(wasm.as_ref()) {
        Ok((_, imports)) => Ok(imports),
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => Err(err),
        Err(nom::Err::Incomplete(_)) => Err(DecodeError::UnexpectedEndOfInput),
    }
}

fn decode(input: &[u8]) -> DecodeResult<'_, Vec<Import>> {
    let (input, _) = decode_header(input)?;

    let mut types: Vec<FuncType> = vec![];
    let mut remaining = input;

    while !remaining.is_empty() {
        let (input, (code, size)) = decode_section_header(remaining)?;
        let (rest, section_contents) = take(size)(input)?;

        trace!("section {code:#04x} ({size} bytes)");

        match SectionCode::from_u8(code) {
            Some(SectionCode::Type) => {
                let (_, func_types) = decode_type_section(section_contents)?;
                types.extend(func_types);
            }
            Some(SectionCode::Import) => {
                let (_, imports) = decode_import_section(section_contents, &types)?;
                // Imports are all we are after; whatever follows stays unread.
                return Ok((rest, imports));
            }
            _ => {
                // skip, including ids no SectionCode maps
            }
        }

        remaining = rest;
    }

    Ok((remaining, vec![]))
}

fn decode_header(input: &[u8]) -> DecodeResult<'_, ()> {
    let (input, magic) = take(4usize)(input)?;
    if magic != WASM_MAGIC {
        return Err(nom::Err::Failure(DecodeError::InvalidMagicNumber));
    }

    let (input, version) = take(4usize)(input)?;
    if version != WASM_VERSION {
        return Err(nom::Err::Failure(DecodeError::InvalidVersion));
    }

    Ok((input, ()))
}

fn decode_section_header(input: &[u8]) -> DecodeResult<'_, (u8, u32)> {
    pair(le_u8, decode_leb128_u32)(input)
}

// nom-leb128 reports failures with nom's stock error type; varint failures
// funnel into the taxonomy here.
fn decode_leb128_u32(input: &[u8]) -> DecodeResult<'_, u32> {
    let result: IResult<&[u8], u32> = leb128_u32(input);
    result.map_err(map_varint_err)
}

fn decode_leb128_u64(input: &[u8]) -> DecodeResult<'_, u64> {
    let result: IResult<&[u8], u64> = leb128_u64(input);
    result.map_err(map_varint_err)
}

fn map_varint_err(err: nom::Err<nom::error::Error<&[u8]>>) -> nom::Err<DecodeError> {
    err.map(|e| DecodeError::from_error_kind(e.input, e.code))
}

fn decode_value_type(input: &[u8]) -> DecodeResult<'_, ValueType> {
    let (input, byte) = le_u8(input)?;

    let value_type = match byte {
        0x7F => ValueType::I32,
        0x7E => ValueType::I64,
        0x7D => ValueType::F32,
        0x7C => ValueType::F64,
        0x7B => ValueType::V128,
        0x70 => ValueType::FuncRef,
        0x6F => ValueType::ExternRef,
        _ => return Err(nom::Err::Failure(DecodeError::UnknownValueType(byte))),
    };

    Ok((input, value_type))
}

fn decode_raw_seq(input: &[u8]) -> DecodeResult<'_, &[u8]> {
    let (rest, sz) = decode_leb128_u32(input)?;
    let (rest, bytes) = take(sz)(rest)?;

    Ok((rest, bytes))
}

/// Malformed utf-8 in a name substitutes U+FFFD instead of failing the decode.
fn decode_name(input: &[u8]) -> DecodeResult<'_, String> {
    let (rest, name_bytes) = decode_raw_seq(input)?;

    Ok((rest, String::from_utf8_lossy(name_bytes).into_owned()))
}

fn decode_func_type(input: &[u8]) -> DecodeResult<'_, FuncType> {
    let (input, form) = le_u8(input)?;
    if form != FUNC_TYPE_FORM {
        return Err(nom::Err::Failure(DecodeError::InvalidFunctionTypeForm(
            form,
        )));
    }

    // value types are one byte each, so the entry count doubles as a byte count
    let (input, tys) = decode_raw_seq(input)?;
    let (_, params) = many0(decode_value_type)(tys)?;

    let (input, tys) = decode_raw_seq(input)?;
    let (_, returns) = many0(decode_value_type)(tys)?;

    Ok((input, FuncType { params, returns }))
}

fn decode_type_section(input: &[u8]) -> DecodeResult<'_, Vec<FuncType>> {
    let (mut input, count) = decode_leb128_u32(input)?;
    let mut types = vec![];

    for _ in 0..count {
        let (rest, func_type) = decode_func_type(input)?;
        types.push(func_type);
        input = rest;
    }

    Ok((input, types))
}

fn decode_limits(input: &[u8]) -> DecodeResult<'_, Limits> {
    let (input, flags) = le_u8(input)?;

    let index = if flags & LIMITS_INDEX64 != 0 {
        IndexType::I64
    } else {
        IndexType::I32
    };
    let shared = flags & LIMITS_SHARED != 0;

    let (input, min) = decode_limit_value(input, index)?;
    let (input, max) = if flags & LIMITS_HAS_MAX != 0 {
        let (input, max) = decode_limit_value(input, index)?;
        (input, Some(max))
    } else {
        (input, None)
    };

    Ok((
        input,
        Limits {
            min,
            max,
            shared,
            index,
        },
    ))
}

// Limit values are 32-bit unless the index flag widens the address space.
fn decode_limit_value(input: &[u8], index: IndexType) -> DecodeResult<'_, u64> {
    match index {
        IndexType::I64 => decode_leb128_u64(input),
        IndexType::I32 => {
            let (input, value) = decode_leb128_u32(input)?;
            Ok((input, u64::from(value)))
        }
    }
}

fn decode_element_type(input: &[u8]) -> DecodeResult<'_, RefType> {
    let (input, byte) = le_u8(input)?;

    let element = match byte {
        0x70 => RefType::Func,
        0x6F => RefType::Extern,
        _ => return Err(nom::Err::Failure(DecodeError::UnknownElementType(byte))),
    };

    Ok((input, element))
}

fn decode_table_type(input: &[u8]) -> DecodeResult<'_, TableType> {
    let (input, element) = decode_element_type(input)?;
    // tables share the limits layout; the shared/index bits do not apply
    // and are dropped here
    let (input, limits) = decode_limits(input)?;

    Ok((
        input,
        TableType {
            element,
            min: limits.min as u32,
            max: limits.max.map(|max| max as u32),
        },
    ))
}

fn decode_global_type(input: &[u8]) -> DecodeResult<'_, GlobalType> {
    let (input, value) = decode_value_type(input)?;
    // 1 marks a mutable global; any other value reads as immutable
    let (input, mutability) = le_u8(input)?;

    Ok((
        input,
        GlobalType {
            value,
            mutable: mutability == 1,
        },
    ))
}

fn decode_import_section<'a>(
    input: &'a [u8],
    types: &[FuncType],
) -> DecodeResult<'a, Vec<Import>> {
    let (input, count) = decode_leb128_u32(input)?;
    let mut imports = vec![];

    let mut remaining = input;

    for _ in 0..count {
        let (rest, module) = decode_name(remaining)?;
        let (rest, name) = decode_name(rest)?;
        let (rest, kind) = le_u8(rest)?;

        let (rest, desc) = match kind {
            0x00 => {
                let (rest, index) = decode_leb128_u32(rest)?;
                let Some(func_type) = types.get(index as usize) else {
                    return Err(nom::Err::Failure(DecodeError::InvalidTypeIndex(index)));
                };
                (rest, ImportDesc::Func(func_type.clone()))
            }
            0x01 => {
                let (rest, table) = decode_table_type(rest)?;
                (rest, ImportDesc::Table(table))
            }
            0x02 => {
                let (rest, limits) = decode_limits(rest)?;
                (rest, ImportDesc::Memory(limits))
            }
            0x03 => {
                let (rest, global) = decode_global_type(rest)?;
                (rest, ImportDesc::Global(global))
            }
            _ => return Err(nom::Err::Failure(DecodeError::UnknownImportKind(kind))),
        };

        imports.push(Import { module, name, desc });

        remaining = rest;
    }

    Ok((remaining, imports))
}
