use chk_diff::diff::{DiffResult, DiffStatus};
use chk_diff::labels::LabelDiff;
use tabled::builder::Builder;
use tabled::settings::Style;

fn status_symbol(status: DiffStatus) -> &'static str {
    match status {
        DiffStatus::Match => "😄",
        DiffStatus::Mismatch => "💀",
        DiffStatus::Unknown => "❓",
    }
}

pub(crate) fn components_table(
    clusters: &[String],
    results: &[DiffResult],
    width: usize,
) -> String {
    let mut builder = Builder::default();
    let mut header = vec![
        "Resource".to_string(),
        "Kind".to_string(),
        "Namespace".to_string(),
    ];
    header.extend(clusters.iter().cloned());
    header.push("Status".to_string());
    builder.push_record(header);

    let mut rows: Vec<&DiffResult> = results.iter().collect();
    rows.sort_by(|a, b| a.id.cmp(&b.id));
    for result in rows {
        let mut row = vec![
            wrap(&result.id.to_string(), width),
            result.kind.to_string(),
            result.namespace.clone(),
        ];
        for per_cluster in &result.per_cluster {
            row.push(match &per_cluster.images {
                Some(images) => images
                    .iter()
                    .map(|image| wrap(image, width))
                    .collect::<Vec<_>>()
                    .join("\n"),
                None => "unavailable".to_string(),
            });
        }
        row.push(status_symbol(result.status).to_string());
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

pub(crate) fn labels_table(clusters: &[String], results: &[LabelDiff]) -> String {
    let mut builder = Builder::default();
    let mut header = vec!["Label".to_string()];
    header.extend(clusters.iter().cloned());
    header.push("Status".to_string());
    builder.push_record(header);

    for result in results {
        let mut row = vec![result.label.clone()];
        for presence in &result.presence {
            row.push(match presence.present {
                Some(true) => "yes".to_string(),
                Some(false) => String::new(),
                None => "unavailable".to_string(),
            });
        }
        row.push(status_symbol(result.status).to_string());
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

/// Breaks long words every `width` characters so a cell stays narrow.
fn wrap(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
