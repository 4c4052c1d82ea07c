use kgmatch::{DetectReport, RelationshipGraph, ResolvedSpan, SpanClass};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";
    pub const UNDERLINE: &str = "\x1b[4m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        /// Underline when colored, bracket otherwise so highlights stay visible.
        pub fn highlight(&self, s: impl AsRef<str>) -> String {
            if self.enabled {
                format!("{}{}{}{}", UNDERLINE, CYAN, s.as_ref(), RESET)
            } else {
                format!("[{}]", s.as_ref())
            }
        }
    }
}

pub fn print_run(input: &str, report: &DetectReport, graph: Option<&RelationshipGraph>, color: bool) {
    let palette = ansi::Palette::new(color);
    let result = &report.result;
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Scanning: \"{}\"", input.trim()), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Highlights ━━━", ansi::GRAY));
    if result.primary_spans.is_empty() {
        println!("{}", palette.dim("  No entities found"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • The text names no catalog entity (matching is case-insensitive)");
        println!("  • The selection is too long or too short for fragment matching");
        println!("\n{}", palette.dim("  Tip: Run with --verbose to see matcher stage counts"));
    } else {
        let line: String = result
            .segments(input)
            .iter()
            .map(|seg| if seg.entity.is_some() { palette.highlight(seg.text) } else { seg.text.to_string() })
            .collect();
        println!("  {}", line.trim());
    }

    if !result.all_candidates.is_empty() {
        println!("\n{}", palette.paint("━━━ Candidates ━━━", ansi::GRAY));
        for (idx, span) in result.all_candidates.iter().enumerate() {
            println!("  {} {}", palette.paint(format!("[{}]", idx), ansi::GRAY), fmt_candidate(span, &palette));
        }
    }

    if let Some(graph) = graph {
        println!("\n{}", palette.paint("━━━ Relationships ━━━", ansi::GRAY));
        print_relationships(report, graph, &palette);
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Matching: {}  │  Resolve: {}  │  Catalog: {} names, {} raw matches",
        palette.paint(format!("{:?}", report.metrics.total), ansi::GREEN),
        palette.paint(format!("{:?}", report.metrics.matching), ansi::CYAN),
        palette.dim(format!("{:?}", report.metrics.resolving)),
        report.metrics.catalog_size,
        report.metrics.occurrences,
    );
    println!();
}

fn fmt_candidate(span: &ResolvedSpan, palette: &ansi::Palette) -> String {
    let occ = &span.occurrence;
    let class = match span.class {
        SpanClass::Primary => palette.paint("primary", ansi::GREEN),
        SpanClass::Nested => palette.paint("nested", ansi::BLUE),
        SpanClass::Dropped => palette.dim("dropped"),
    };
    format!(
        "{} {} {} {} {}",
        palette.bold(&occ.entity),
        palette.dim("│"),
        palette.paint(format!("span {}..{}", occ.start, occ.end), ansi::YELLOW),
        class,
        palette.dim(format!("({})", occ.label())),
    )
}

fn print_relationships(report: &DetectReport, graph: &RelationshipGraph, palette: &ansi::Palette) {
    let mut shown: Vec<&str> = Vec::new();
    for span in &report.result.all_candidates {
        let entity = span.occurrence.entity.as_str();
        if shown.contains(&entity) {
            continue;
        }
        shown.push(entity);

        let relationships = graph.relationships_for(entity);
        println!("  {} {}", palette.bold(entity), palette.dim(format!("({} relationships)", relationships.len())));
        for rel in relationships {
            println!(
                "    {} {} {}",
                rel.source,
                palette.paint(&rel.record.relationship, ansi::BLUE),
                rel.record.target
            );
            if let Some(evidence) = &rel.record.evidence {
                println!("      {}", palette.dim(evidence));
            }
        }
    }
}
