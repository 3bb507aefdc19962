use crate::backend::Backend;
use crate::cli::{BackendKind, DoctorArgs};
use crate::config_loader::resolve_model;
use crate::output::OutputWriter;
use crate::output_types::{CheckResult, ConfigEntry, DoctorOutput};
use anyhow::Result;
use console::style;
use flexsearch_core::config::LayeredConfig;

pub async fn execute(
    args: DoctorArgs,
    config: &LayeredConfig,
    backend_kind: BackendKind,
    output: &OutputWriter,
) -> Result<()> {
    let mut entries: Vec<ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry { key, value, source })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    let (backend_check, embedder_check) = match resolve_model(config) {
        Ok(model) => {
            let backend = Backend::new(backend_kind, config, model)?;
            (check_backend(&backend, args.verbose).await, check_embedder(&backend).await)
        }
        Err(e) => {
            let failed = CheckResult { name: "model".to_string(), ok: false, detail: e.to_string() };
            let skipped = CheckResult {
                name: "embedder".to_string(),
                ok: false,
                detail: "skipped: no valid model".to_string(),
            };
            (failed, skipped)
        }
    };

    if output.is_json() {
        output.result(DoctorOutput { backend: backend_check, embedder: embedder_check, config: entries })?;
        return Ok(());
    }

    println!("\n{}", style("Flexsearch Health Check").bold().underlined());
    println!("{}", style("═".repeat(60)).dim());

    let checks = [&backend_check, &embedder_check];
    for check in checks {
        if check.ok {
            println!("{} {}: {}", style("✓").green(), check.name, check.detail);
        } else {
            println!("{} {}: {}", style("✗").red(), check.name, check.detail);
        }
    }

    if !backend_check.ok && backend_kind == BackendKind::Elasticsearch {
        println!("  → Start Elasticsearch or set FLEXSEARCH_ELASTICSEARCH_URL");
    }
    if !embedder_check.ok {
        println!("  → Start the embedding service or set FLEXSEARCH_EMBEDDER_PROVIDER=hashing");
    }

    output.section("Effective Configuration");
    output.table(entries);

    let passed = checks.iter().filter(|c| c.ok).count();
    println!();
    if passed == checks.len() {
        println!("{}", style("All checks passed!").green());
    } else {
        println!(
            "{}",
            style(format!("{}/{} checks passed. Follow the suggestions above.", passed, checks.len()))
                .yellow()
        );
    }

    Ok(())
}

async fn check_backend(backend: &Backend, verbose: bool) -> CheckResult {
    let name = format!("backend ({})", backend.store.backend_name());
    if let Err(e) = backend.store.ping().await {
        return CheckResult { name, ok: false, detail: e.to_string() };
    }

    let index = &backend.target.index;
    let detail = match backend.store.index_info(index).await {
        Ok(Some(info)) => {
            let mut detail = format!("reachable, index '{}' exists", index);
            if verbose {
                if let Some(dims) = info.dimensions {
                    detail.push_str(&format!(", {} dimensions", dims));
                }
                if let Some(model) = info.model {
                    detail.push_str(&format!(", model {}", model));
                }
                if let Ok(count) = backend.store.count(index).await {
                    detail.push_str(&format!(", {} documents", count));
                }
            }
            detail
        }
        Ok(None) => format!("reachable, index '{}' not created yet", index),
        Err(e) => format!("reachable, index lookup failed: {}", e),
    };

    CheckResult { name, ok: true, detail }
}

async fn check_embedder(backend: &Backend) -> CheckResult {
    let name = format!("embedder ({})", backend.embedder.model_name());
    match backend.embedder.encode("health check").await {
        Ok(vector) => CheckResult {
            name,
            ok: true,
            detail: format!("returned a {}-dimensional vector", vector.len()),
        },
        Err(e) => CheckResult { name, ok: false, detail: e.to_string() },
    }
}
