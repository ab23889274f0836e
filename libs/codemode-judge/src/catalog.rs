// Question catalog: read-only lookup of questions by id
use async_trait::async_trait;
use codemode_common::types::QuestionRecord;
use std::collections::HashMap;
use std::path::Path;
use anyhow::{Context, Result};

use crate::error::CatalogError;

#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    /// `Ok(None)` means the question does not exist
    async fn find_by_id(&self, question_id: &str) -> Result<Option<QuestionRecord>, CatalogError>;
}

/// Catalog held in memory; used by the CLI and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    questions: HashMap<String, QuestionRecord>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_question(mut self, question_id: impl Into<String>, question: QuestionRecord) -> Self {
        self.insert(question_id, question);
        self
    }

    pub fn insert(&mut self, question_id: impl Into<String>, question: QuestionRecord) {
        self.questions.insert(question_id.into(), question);
    }

    /// Load a JSON object mapping question ids to question documents
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read questions file {}", path.display()))?;
        let questions: HashMap<String, QuestionRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse questions file {}", path.display()))?;
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[async_trait]
impl QuestionCatalog for InMemoryCatalog {
    async fn find_by_id(&self, question_id: &str) -> Result<Option<QuestionRecord>, CatalogError> {
        Ok(self.questions.get(question_id).cloned())
    }
}

/// Catalog backed by question documents stored in Redis
#[derive(Clone)]
pub struct RedisCatalog {
    conn: redis::aio::ConnectionManager,
}

impl RedisCatalog {
    pub fn new(conn: redis::aio::ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn connect(redis_url: &str) -> Result<Self, CatalogError> {
        let client = redis::Client::open(redis_url)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl QuestionCatalog for RedisCatalog {
    async fn find_by_id(&self, question_id: &str) -> Result<Option<QuestionRecord>, CatalogError> {
        // ConnectionManager clones share one multiplexed connection
        let mut conn = self.conn.clone();
        Ok(codemode_common::redis::get_question(&mut conn, question_id).await?)
    }
}
