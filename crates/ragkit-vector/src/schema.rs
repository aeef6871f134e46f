use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

use ragkit_core::{Error, Result};

pub const ID_COLUMN: &str = "id";
pub const TEXT_COLUMN: &str = "text";
pub const SOURCE_COLUMN: &str = "source";
pub const VECTOR_COLUMN: &str = "vector";

/// `id` is the storage-assigned key, increasing with insertion order.
pub fn build_arrow_schema(dimensions: i32) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new(ID_COLUMN, DataType::Int64, false),
        Field::new(TEXT_COLUMN, DataType::Utf8, false),
        Field::new(SOURCE_COLUMN, DataType::Utf8, false),
        Field::new(
            VECTOR_COLUMN,
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dimensions),
            true,
        ),
    ]))
}

/// Width of the `vector` column of an existing table.
pub fn vector_width(schema: &Schema) -> Result<usize> {
    let field = schema
        .field_with_name(VECTOR_COLUMN)
        .map_err(|_| Error::storage(format!("table has no '{VECTOR_COLUMN}' column")))?;
    match field.data_type() {
        DataType::FixedSizeList(_, width) => usize::try_from(*width)
            .map_err(|_| Error::storage(format!("invalid vector width {width}"))),
        other => Err(Error::storage(format!("'{VECTOR_COLUMN}' column has unexpected type {other}"))),
    }
}

pub fn dimensions_to_width(dimensions: usize) -> Result<i32> {
    i32::try_from(dimensions).map_err(|_| Error::invalid(format!("dimensions {dimensions} is too large")))
}
