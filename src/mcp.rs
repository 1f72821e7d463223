use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::page_range::{
    page_range_examples, parse_page_ranges, validate_page_ranges, PageSet, RangeError, Validation,
};
use crate::pdf::split::split_file;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseRangesRequest {
    #[schemars(description = "Page ranges (e.g., '1-5,8,10-12')")]
    pub ranges: String,
    #[schemars(description = "Page count of the document; pages beyond it are rejected")]
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FormatRangesRequest {
    #[schemars(description = "1-based page numbers, in any order")]
    pub pages: Vec<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitPdfRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-3,5,7-9')")]
    pub ranges: String,
    #[schemars(description = "Output ZIP path (default: <name>_split.zip next to the input)")]
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SplitServer {
    config: Config,
    tool_router: ToolRouter<Self>,
}

impl SplitServer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for SplitServer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[tool_router]
impl SplitServer {
    #[tool(description = "Validate a page range specification like '1-3,5,7-9' and return the sorted, deduplicated pages it selects. Pass total_pages to also reject pages beyond the document length.")]
    fn parse_page_ranges(&self, Parameters(req): Parameters<ParseRangesRequest>) -> String {
        let result = match req.total_pages {
            Some(total) => validate_page_ranges(&req.ranges, total),
            None => parse_page_ranges(&req.ranges),
        };
        to_json(&Validation::from(result))
    }

    #[tool(description = "Compress a list of page numbers into the shortest range specification, e.g. [1,2,3,7] -> '1-3,7'")]
    fn format_page_ranges(&self, Parameters(req): Parameters<FormatRangesRequest>) -> String {
        if req.pages.contains(&0) {
            return format!("Error: {}", RangeError::NonPositive);
        }
        let pages: PageSet = req.pages.into_iter().collect();
        to_json(&FormatResult {
            ranges: pages.to_string(),
        })
    }

    #[tool(description = "List example page range specifications")]
    fn page_range_examples(&self) -> String {
        to_json(&page_range_examples())
    }

    #[tool(description = "Split a PDF by page ranges into a ZIP archive holding one PDF per run of consecutive pages")]
    fn split_pdf(&self, Parameters(req): Parameters<SplitPdfRequest>) -> String {
        let output = req.output.as_deref().map(Path::new);
        match split_file(Path::new(&req.path), &req.ranges, output, &self.config) {
            Ok(summary) => to_json(&summary),
            Err(e) => format!("Error: {}", e),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FormatResult {
    pub ranges: String,
}

#[tool_handler]
impl ServerHandler for SplitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF splitting tools. Use parse_page_ranges to check a page range \
                 specification, format_page_ranges to compress page numbers into one, \
                 page_range_examples for sample specifications, and split_pdf to write \
                 a ZIP of PDFs for the selected pages."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let server = SplitServer::new(config);
    info!("serving MCP tools on stdio");

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::document::tests::sample_pdf;
    use serde_json::Value;

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).unwrap()
    }

    #[test]
    fn test_parse_tool() {
        let server = SplitServer::default();
        let out = server.parse_page_ranges(Parameters(ParseRangesRequest {
            ranges: "1-3,5,7-9".to_string(),
            total_pages: None,
        }));
        let value = parse(&out);
        assert_eq!(value["valid"], true);
        assert_eq!(value["pages"], serde_json::json!([1, 2, 3, 5, 7, 8, 9]));
        assert_eq!(value["ranges"], "1-3,5,7-9");
    }

    #[test]
    fn test_parse_tool_with_bound() {
        let server = SplitServer::default();
        let out = server.parse_page_ranges(Parameters(ParseRangesRequest {
            ranges: "1-5,20".to_string(),
            total_pages: Some(10),
        }));
        let value = parse(&out);
        assert_eq!(value["valid"], false);
        assert_eq!(value["kind"], "out_of_bounds");
        assert_eq!(
            value["error"],
            "Page(s) 20 are out of bounds (PDF has 10 pages)"
        );
    }

    #[test]
    fn test_parse_tool_huge_range() {
        let server = SplitServer::default();
        let out = server.parse_page_ranges(Parameters(ParseRangesRequest {
            ranges: "1-400000000".to_string(),
            total_pages: None,
        }));
        let value = parse(&out);
        assert_eq!(value["valid"], true);
        assert_eq!(value["count"], 400000000);
        assert_eq!(value["ranges"], "1-400000000");
        assert!(value.get("pages").is_none());

        let out = server.parse_page_ranges(Parameters(ParseRangesRequest {
            ranges: "1-400000000".to_string(),
            total_pages: Some(5),
        }));
        assert_eq!(parse(&out)["kind"], "out_of_bounds");
    }

    #[test]
    fn test_format_tool() {
        let server = SplitServer::default();
        let out = server.format_page_ranges(Parameters(FormatRangesRequest {
            pages: vec![11, 1, 2, 3, 7, 9, 10, 3],
        }));
        assert_eq!(parse(&out)["ranges"], "1-3,7,9-11");

        let out = server.format_page_ranges(Parameters(FormatRangesRequest { pages: vec![0, 1] }));
        assert_eq!(out, "Error: Page numbers must be positive");
    }

    #[test]
    fn test_examples_tool() {
        let server = SplitServer::default();
        let value = parse(&server.page_range_examples());
        assert_eq!(value.as_array().unwrap().len(), 5);
        assert_eq!(value[3], "1-5,8,10-12");
    }

    #[test]
    fn test_split_tool() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("slides.pdf");
        std::fs::write(&input, sample_pdf(4)).unwrap();

        let server = SplitServer::default();
        let out = server.split_pdf(Parameters(SplitPdfRequest {
            path: input.display().to_string(),
            ranges: "1,3-4".to_string(),
            output: None,
        }));
        let value = parse(&out);
        assert_eq!(value["total_pages"], 4);
        assert_eq!(value["entries"][0]["name"], "slides_page1.pdf");
        assert_eq!(value["entries"][1]["name"], "slides_pages3-4.pdf");
        assert!(dir.path().join("slides_split.zip").exists());
    }

    #[test]
    fn test_split_tool_reports_errors() {
        let server = SplitServer::default();
        let out = server.split_pdf(Parameters(SplitPdfRequest {
            path: "/nonexistent/missing.pdf".to_string(),
            ranges: "1".to_string(),
            output: None,
        }));
        assert!(out.starts_with("Error: "));
    }
}
