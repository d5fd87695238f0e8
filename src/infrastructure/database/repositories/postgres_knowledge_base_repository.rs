use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::KnowledgeBase;
use crate::domain::repositories::{
    KnowledgeBaseRepository, knowledge_base_repository::KnowledgeBaseRepositoryError,
};
use crate::infrastructure::database::models::{KnowledgeBaseModel, NewKnowledgeBaseModel};
use crate::infrastructure::database::schema::knowledge_bases::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresKnowledgeBaseRepository {
    pool: DbPool,
}

impl PostgresKnowledgeBaseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KnowledgeBaseRepository for PostgresKnowledgeBaseRepository {
    async fn save(&self, kb: &KnowledgeBase) -> Result<(), KnowledgeBaseRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        let new_kb = NewKnowledgeBaseModel::from(kb);

        diesel::insert_into(knowledge_bases)
            .values(&new_kb)
            .on_conflict(id)
            .do_update()
            .set(&new_kb)
            .execute(&mut conn)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        kb_id: Uuid,
    ) -> Result<Option<KnowledgeBase>, KnowledgeBaseRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        let result = knowledge_bases
            .find(kb_id)
            .first::<KnowledgeBaseModel>(&mut conn)
            .optional()
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.map(KnowledgeBase::from))
    }

    async fn find_all(
        &self,
        owner: Option<i64>,
    ) -> Result<Vec<KnowledgeBase>, KnowledgeBaseRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        let mut query = knowledge_bases.order(created_at.desc()).into_boxed();
        if let Some(owner_id) = owner {
            query = query.filter(user_id.eq(owner_id));
        }

        let models = query
            .load::<KnowledgeBaseModel>(&mut conn)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        Ok(models.into_iter().map(KnowledgeBase::from).collect())
    }

    async fn delete(&self, kb_id: Uuid) -> Result<bool, KnowledgeBaseRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        let deleted = diesel::delete(knowledge_bases.find(kb_id))
            .execute(&mut conn)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted > 0)
    }

    async fn increment_doc_count(&self, kb_id: Uuid) -> Result<(), KnowledgeBaseRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        // Single-statement arithmetic so concurrent ingests never lose an
        // update.
        let updated = diesel::update(knowledge_bases.find(kb_id))
            .set((
                doc_count.eq(doc_count + 1),
                updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        if updated == 0 {
            return Err(KnowledgeBaseRepositoryError::NotFound(kb_id));
        }
        Ok(())
    }

    async fn decrement_doc_count(&self, kb_id: Uuid) -> Result<(), KnowledgeBaseRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        // Floored at zero in SQL; the count must never go negative.
        let updated = diesel::update(knowledge_bases.find(kb_id))
            .set((
                doc_count.eq(diesel::dsl::sql::<diesel::sql_types::Integer>(
                    "GREATEST(doc_count - 1, 0)",
                )),
                updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .map_err(|e| KnowledgeBaseRepositoryError::DatabaseError(e.to_string()))?;

        if updated == 0 {
            return Err(KnowledgeBaseRepositoryError::NotFound(kb_id));
        }
        Ok(())
    }
}
