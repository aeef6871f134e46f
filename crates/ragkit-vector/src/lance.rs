//! Persistent vector store on a single LanceDB table.
//!
//! Writes are serialized through one lock so storage keys stay contiguous.
//! Every write is a single LanceDB commit: `insert_batch` appends one version,
//! `replace_all` overwrites the table in one version, so concurrent readers see
//! either the previous data set or the new one. Search scans the table and
//! ranks exactly in process; no approximate index is involved.

use arrow_array::cast::AsArray;
use arrow_array::types::Float32Type;
use arrow_array::{Array, FixedSizeListArray, Int64Array, RecordBatch, RecordBatchIterator, StringArray};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase, Select};
use lancedb::table::AddDataMode;
use lancedb::{Connection, Table};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use ragkit_core::ranking::Ranking;
use ragkit_core::{Error, NewRecord, Result, SearchParams, VectorStore};

use crate::schema::{build_arrow_schema, dimensions_to_width, vector_width, ID_COLUMN, TEXT_COLUMN, VECTOR_COLUMN};
use crate::table::{ensure_table, open_db};

pub struct LanceVectorStore {
    db: Connection,
    table_name: String,
    dimensions: usize,
    width: i32,
    write_lock: Mutex<()>,
}

impl LanceVectorStore {
    /// Open (creating if needed) `table_name` under `db_path`.
    ///
    /// An existing table whose vector width differs from `dimensions` is a
    /// configuration error.
    pub async fn open(db_path: &Path, table_name: &str, dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::invalid("dimensions must be greater than 0"));
        }
        let width = dimensions_to_width(dimensions)?;
        let db = open_db(db_path.to_string_lossy().as_ref()).await?;
        ensure_table(&db, table_name, build_arrow_schema(width)).await?;
        let store = Self { db, table_name: table_name.to_string(), dimensions, width, write_lock: Mutex::new(()) };
        let table = store.table().await?;
        let schema = table.schema().await.map_err(Error::storage)?;
        let stored = vector_width(&schema)?;
        if stored != dimensions {
            return Err(Error::dimension_mismatch(dimensions, stored));
        }
        info!(db = %db_path.display(), table = table_name, dimensions, "opened LanceDB vector store");
        Ok(store)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn table(&self) -> Result<Table> {
        self.db.open_table(&self.table_name).execute().await.map_err(Error::storage)
    }

    fn check_records(&self, records: &[NewRecord]) -> Result<()> {
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != self.dimensions) {
            return Err(Error::dimension_mismatch(self.dimensions, bad.embedding.len()));
        }
        Ok(())
    }

    fn to_record_batch(&self, first_key: i64, records: &[NewRecord]) -> Result<RecordBatch> {
        let mut ids = Vec::with_capacity(records.len());
        let mut texts = Vec::with_capacity(records.len());
        let mut sources = Vec::with_capacity(records.len());
        let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::with_capacity(records.len());
        for (key, r) in (first_key..).zip(records) {
            ids.push(key);
            texts.push(r.text.clone());
            sources.push(r.source.clone());
            vectors.push(Some(r.embedding.iter().map(|&x| Some(x)).collect()));
        }
        RecordBatch::try_new(
            build_arrow_schema(self.width),
            vec![
                Arc::new(Int64Array::from(ids)),
                Arc::new(StringArray::from(texts)),
                Arc::new(StringArray::from(sources)),
                Arc::new(FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(vectors, self.width)),
            ],
        )
        .map_err(Error::storage)
    }

    async fn write(&self, table: &Table, batch: RecordBatch, mode: AddDataMode) -> Result<()> {
        let schema = batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
        table.add(reader).mode(mode).execute().await.map_err(Error::storage)?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for LanceVectorStore {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let table = self.table().await?;
        table.delete("true").await.map_err(Error::storage)?;
        info!(table = %self.table_name, "cleared vector table");
        Ok(())
    }

    async fn insert_batch(&self, records: Vec<NewRecord>) -> Result<usize> {
        self.check_records(&records)?;
        if records.is_empty() {
            return Ok(0);
        }
        let _guard = self.write_lock.lock().await;
        let table = self.table().await?;
        // records are never deleted one by one, so the row count is the next key
        let existing = table.count_rows(None).await.map_err(Error::storage)?;
        let first_key = i64::try_from(existing).map_err(Error::storage)?;
        let batch = self.to_record_batch(first_key, &records)?;
        self.write(&table, batch, AddDataMode::Append).await?;
        info!(table = %self.table_name, inserted = records.len(), "appended records");
        Ok(records.len())
    }

    async fn replace_all(&self, records: Vec<NewRecord>) -> Result<usize> {
        self.check_records(&records)?;
        if records.is_empty() {
            self.clear().await?;
            return Ok(0);
        }
        let _guard = self.write_lock.lock().await;
        let table = self.table().await?;
        let batch = self.to_record_batch(0, &records)?;
        self.write(&table, batch, AddDataMode::Overwrite).await?;
        info!(table = %self.table_name, inserted = records.len(), "replaced all records");
        Ok(records.len())
    }

    async fn search(&self, query: &[f32], params: &SearchParams) -> Result<Vec<String>> {
        let mut ranking = Ranking::new(query, self.dimensions, *params)?;
        let table = self.table().await?;
        let mut stream = table
            .query()
            .select(Select::columns(&[ID_COLUMN, TEXT_COLUMN, VECTOR_COLUMN]))
            .execute()
            .await
            .map_err(Error::storage)?;
        let mut scanned = 0usize;
        while let Some(batch) = stream.try_next().await.map_err(Error::storage)? {
            let ids = column::<Int64Array>(&batch, ID_COLUMN)?;
            let texts = column::<StringArray>(&batch, TEXT_COLUMN)?;
            let vectors = column::<FixedSizeListArray>(&batch, VECTOR_COLUMN)?;
            for i in 0..batch.num_rows() {
                if vectors.is_null(i) {
                    continue;
                }
                let key = u64::try_from(ids.value(i)).map_err(Error::storage)?;
                let row = vectors.value(i);
                let values = row.as_primitive::<Float32Type>();
                ranking.offer(key, texts.value(i), values.values())?;
            }
            scanned += batch.num_rows();
        }
        debug!(table = %self.table_name, scanned, matched = ranking.len(), metric = %params.metric, top_k = params.top_k, "vector search");
        Ok(ranking.finish())
    }

    async fn count(&self) -> Result<usize> {
        let table = self.table().await?;
        table.count_rows(None).await.map_err(Error::storage)
    }
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| Error::storage(format!("column '{name}' is missing or has an unexpected type")))
}
