use crate::output::OutputWriter;
use crate::output_types::ModelRow;
use anyhow::Result;
use flexsearch_core::config::LayeredConfig;
use flexsearch_llm::EmbeddingModel;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    // An invalid configured model still lists the allow-list, with nothing selected
    let selected = config.model.value.parse::<EmbeddingModel>().ok();

    let rows: Vec<ModelRow> = EmbeddingModel::ALL
        .iter()
        .map(|model| ModelRow {
            name: model.name().to_string(),
            dimensions: model.dimensions(),
            selected: Some(*model) == selected,
        })
        .collect();

    if output.is_json() {
        output.result(rows)?;
    } else {
        output.table(rows);
        if selected.is_none() {
            output.warning(format!(
                "Configured model '{}' is not supported",
                config.model.value
            ));
        }
    }

    Ok(())
}
