//! Plan serialization helpers.
//!
//! Plans are JSON documents. Callers loading a plan should pass it to
//! [`ScanPlan::apply`], which validates before touching the scan.

use std::fs;
use std::path::Path;

use crate::error::{SieveError, SieveResult};

use super::document::ScanPlan;

/// Serialize a plan to pretty JSON.
pub fn to_json_pretty(plan: &ScanPlan) -> SieveResult<String> {
    serde_json::to_string_pretty(plan).map_err(|e| SieveError::config(format!("serialize plan: {e}")))
}

/// Deserialize a plan from JSON.
pub fn from_json(s: &str) -> SieveResult<ScanPlan> {
    serde_json::from_str::<ScanPlan>(s).map_err(|e| SieveError::config(format!("deserialize plan: {e}")))
}

/// Read and deserialize a plan file.
pub fn load(path: impl AsRef<Path>) -> SieveResult<ScanPlan> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|e| SieveError::config(format!("read plan {}: {e}", path.display())))?;
    let plan = from_json(&raw)?;
    tracing::debug!(
        target: "plan",
        path = %path.display(),
        sources = plan.sources.len(),
        filters = plan.filters.len(),
        "plan_loaded"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{FilterSpec, SourceSpec, TypeRef};

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "sources": [
                { "type": "module", "module": "app.core" },
                { "type": "namespace_of", "marker": { "module": "app.web", "namespace": "App.Web", "name": "Home" } }
            ],
            "filters": [
                { "type": "exclude_namespace", "prefix": "App.Web.Internal" },
                { "type": "type_list", "include": [ { "module": "app.core", "name": "Program" } ] }
            ]
        }"#;

        let plan = from_json(json).unwrap();
        assert_eq!(plan.version, ScanPlan::CURRENT_VERSION);
        assert_eq!(
            plan.sources[1],
            SourceSpec::NamespaceOf {
                marker: TypeRef::new("app.web", "App.Web", "Home")
            }
        );
        assert_eq!(
            plan.filters[1],
            FilterSpec::TypeList {
                include: vec![TypeRef::new("app.core", "", "Program")],
                exclude: Vec::new(),
            }
        );
    }

    #[test]
    fn test_pretty_json_reads_back() {
        let plan = ScanPlan::new()
            .with_source(SourceSpec::Module {
                module: "app.core".to_string(),
            })
            .with_filter(FilterSpec::IncludeWhere {
                predicate: "is_handler".to_string(),
            });
        let json = to_json_pretty(&plan).unwrap();
        assert!(json.contains("\"include_where\""));
        assert_eq!(from_json(&json).unwrap(), plan);
    }

    #[test]
    fn test_unknown_filter_type() {
        let err = from_json(r#"{ "filters": [ { "type": "include_everything" } ] }"#).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_missing_file() {
        let err = load("/definitely/not/here/plan.json").unwrap_err();
        assert!(err.is_config());
        assert!(format!("{err}").contains("plan.json"));
    }
}
