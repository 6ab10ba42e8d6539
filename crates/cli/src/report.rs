use anyhow::Result;
use covgap_segmenter::{BranchEdge, CodeSegment};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Serialize)]
struct SegmentOutput<'a> {
    filename: String,
    name: &'a str,
    kind: &'static str,
    residual: bool,
    begin: usize,
    end: usize,
    missing_lines: &'a BTreeSet<usize>,
    missing_branches: &'a BTreeSet<BranchEdge>,
    executed_lines: &'a BTreeSet<usize>,
    missing_count: usize,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    excerpt: Option<String>,
}

impl<'a> SegmentOutput<'a> {
    fn new(segment: &'a CodeSegment, with_excerpt: bool) -> Result<Self> {
        Ok(Self {
            filename: segment.filename.display().to_string(),
            name: &segment.name,
            kind: segment.kind.as_str(),
            residual: segment.residual,
            begin: segment.begin,
            end: segment.end,
            missing_lines: &segment.missing_lines,
            missing_branches: &segment.missing_branches,
            executed_lines: &segment.executed_lines,
            missing_count: segment.missing_count(),
            description: segment.describe_missing(),
            excerpt: with_excerpt.then(|| segment.excerpt()).transpose()?,
        })
    }
}

pub fn render_json(segments: &[CodeSegment], with_excerpt: bool, pretty: bool) -> Result<String> {
    let rows = segments
        .iter()
        .map(|segment| SegmentOutput::new(segment, with_excerpt))
        .collect::<Result<Vec<_>>>()?;

    Ok(if pretty {
        serde_json::to_string_pretty(&rows)?
    } else {
        serde_json::to_string(&rows)?
    })
}

pub fn render_text(segments: &[CodeSegment], with_excerpt: bool) -> Result<String> {
    let mut text = String::new();
    for segment in segments {
        text.push_str(&format!(
            "{} {} ({} missing): {}\n",
            segment.identify(),
            display_name(segment),
            segment.missing_count(),
            segment.describe_missing()
        ));
        if with_excerpt {
            text.push_str(&segment.annotated_excerpt()?);
            text.push('\n');
        }
    }
    Ok(text.trim_end().to_string())
}

fn display_name(segment: &CodeSegment) -> String {
    match (segment.name.is_empty(), segment.residual) {
        (true, _) => "<module>".to_string(),
        (false, true) => format!("{} (body)", segment.name),
        (false, false) => segment.name.clone(),
    }
}
