use crate::api::arrow::DigipinCellsToArrow;
use crate::api::cell::DigipinCell;
use crate::util::error::DigipinError;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use log::info;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;

/// Writes a record batch with a geometry column to a GeoParquet file (WKB encoded).
pub fn write_geoparquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), DigipinError> {
    let path = path.as_ref();
    let schema = batch.schema();

    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();

    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&schema, &options)
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    let file = File::create(path).map_err(|e| DigipinError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), None)
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    let encoded_batch = encoder
        .encode_record_batch(batch)
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    writer
        .write(&encoded_batch)
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    let kv_metadata = encoder
        .into_keyvalue()
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    writer.append_key_value_metadata(kv_metadata);
    writer
        .finish()
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    info!("wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}

pub trait DigipinCellsToGeoParquet: DigipinCellsToArrow {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), DigipinError>;
}

impl DigipinCellsToGeoParquet for [DigipinCell] {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), DigipinError> {
        let batch = self.to_record_batch()?;
        write_geoparquet(&batch, path)
    }
}

impl DigipinCellsToGeoParquet for Vec<DigipinCell> {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), DigipinError> {
        self.as_slice().to_geoparquet(path)
    }
}
