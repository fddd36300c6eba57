use crate::{Db, types::DateTime};
use sqlx::types::Json;
use sts_core::{
    models::{Metric, NodeMap},
    ports::CacheRepository,
};
use time::OffsetDateTime;

impl CacheRepository for Db {
    type Error = sqlx::Error;

    async fn get(&self, metric: Metric) -> Result<Option<NodeMap>, Self::Error> {
        let tree = sqlx::query_scalar::<_, Json<NodeMap>>(
            r#"
            select
                json(tree)
            from
                metric_cache
            where
                metric = $1
            "#,
        )
        .bind(metric.as_str())
        .fetch_optional(&self.reader)
        .await?;

        Ok(tree.map(|Json(tree)| tree))
    }

    async fn get_timestamp(&self, metric: Metric) -> Result<Option<OffsetDateTime>, Self::Error> {
        let built_at = sqlx::query_scalar::<_, DateTime>(
            r#"
            select
                built_at
            from
                metric_cache
            where
                metric = $1
            "#,
        )
        .bind(metric.as_str())
        .fetch_optional(&self.reader)
        .await?;

        Ok(built_at.map(Into::into))
    }

    async fn put(
        &self,
        metric: Metric,
        tree: &NodeMap,
        timestamp: OffsetDateTime,
    ) -> Result<(), Self::Error> {
        sqlx::query(
            r#"
            insert into
                metric_cache (metric, tree, built_at)
            values
                ($1, jsonb($2), $3)
            on conflict (metric) do update set
                tree = excluded.tree,
                built_at = excluded.built_at
            "#,
        )
        .bind(metric.as_str())
        .bind(Json(tree))
        .bind(DateTime::from(timestamp))
        .execute(&self.writer)
        .await?;

        Ok(())
    }
}
