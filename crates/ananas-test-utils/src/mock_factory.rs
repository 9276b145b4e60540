// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock factories and the runners they create.

use async_trait::async_trait;
use serde_json::json;

use ananas_core::{
    AnanasError, Dataframe, Field, Paginator, PaginatorFactory, Schema, StepFactory, StepRunner,
    StepSpec,
};

/// Step factory reporting a fixed type name.
#[derive(Debug, Clone)]
pub struct MockStepFactory {
    name: String,
}

impl MockStepFactory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl StepFactory for MockStepFactory {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn create(&self, spec: &StepSpec) -> Result<Box<dyn StepRunner>, AnanasError> {
        Ok(Box::new(MockStepRunner::new(&spec.id)))
    }
}

/// Paginator factory reporting a fixed type name.
#[derive(Debug, Clone)]
pub struct MockPaginatorFactory {
    name: String,
}

impl MockPaginatorFactory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PaginatorFactory for MockPaginatorFactory {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn create(&self, _spec: &StepSpec) -> Result<Box<dyn Paginator>, AnanasError> {
        Ok(Box::new(MockPaginator))
    }
}

/// A step runner whose schema is a single `value` column once built.
#[derive(Debug)]
pub struct MockStepRunner {
    step_id: String,
    schema: Option<Schema>,
}

impl MockStepRunner {
    pub fn new(step_id: &str) -> Self {
        Self {
            step_id: step_id.to_string(),
            schema: None,
        }
    }
}

fn value_schema() -> Schema {
    Schema {
        fields: vec![Field {
            name: "value".to_string(),
            field_type: "INTEGER".to_string(),
        }],
    }
}

#[async_trait]
impl StepRunner for MockStepRunner {
    fn step_id(&self) -> &str {
        &self.step_id
    }

    async fn build(&mut self) -> Result<(), AnanasError> {
        self.schema = Some(value_schema());
        Ok(())
    }

    fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }
}

/// A paginator over the integers, `page_size` rows per page.
#[derive(Debug, Default)]
pub struct MockPaginator;

#[async_trait]
impl Paginator for MockPaginator {
    async fn paginate(&self, page: u32, page_size: u32) -> Result<Dataframe, AnanasError> {
        let start = u64::from(page) * u64::from(page_size);
        let data = (start..start + u64::from(page_size))
            .map(|n| vec![json!(n)])
            .collect();
        Ok(Dataframe {
            schema: value_schema(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_runner_builds_schema() {
        let factory = MockStepFactory::new("Mock");
        let spec = StepSpec {
            id: "s1".into(),
            metadata_id: "com.acme.mock".into(),
            ..Default::default()
        };
        let mut runner = factory.create(&spec).unwrap();
        assert_eq!(runner.step_id(), "s1");
        assert!(runner.schema().is_none());
        runner.build().await.unwrap();
        assert_eq!(runner.schema().unwrap().fields[0].name, "value");
    }

    #[tokio::test]
    async fn paginator_pages_through_integers() {
        let paginator = MockPaginatorFactory::new("Mock")
            .create(&StepSpec::default())
            .unwrap();
        let page = paginator.paginate(2, 3).await.unwrap();
        assert_eq!(page.data, vec![vec![json!(6)], vec![json!(7)], vec![json!(8)]]);
    }
}
