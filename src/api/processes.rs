//! Process and Process Graph Endpoints

use serde::Serialize;

use super::{query_string, DataService, Entity, Method};
use crate::error::ApiResult;
use crate::models::{Process, ProcessEdge};

impl Entity for Process {
    const PATH: &'static str = "processes";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessInput {
    pub process_name: String,
    pub description: String,
}

impl DataService {
    pub async fn process_graph(&self) -> ApiResult<Vec<ProcessEdge>> {
        self.fetch(Method::Get, "process-graph", None)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn add_process_edge(&self, edge: ProcessEdge) -> ApiResult<()> {
        self.execute(Method::Post, &edge_path(edge), None).await
    }

    pub async fn remove_process_edge(&self, edge: ProcessEdge) -> ApiResult<()> {
        self.execute(Method::Delete, &edge_path(edge), None).await
    }
}

fn edge_path(edge: ProcessEdge) -> String {
    format!(
        "process-graph{}",
        query_string(&[
            ("from_process_id", Some(edge.from_process_id.to_string())),
            ("to_process_id", Some(edge.to_process_id.to_string())),
        ])
    )
}
