use super::{NumericSummary, TableProfile};
use prettytable::{format, Cell, Row, Table};

fn header_row(names: &[&str]) -> Row {
    Row::new(
        names
            .iter()
            .map(|n| Cell::new(n).style_spec("bFg"))
            .collect(),
    )
}

fn num(v: Option<f64>) -> String {
    match v {
        Some(x) => format!("{:.6}", x),
        None => "NaN".to_string(),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table
}

fn head_table(p: &TableProfile) -> Table {
    let mut table = new_table();
    let names: Vec<&str> = p.headers.iter().map(String::as_str).collect();
    table.set_titles(header_row(&names));
    for row in &p.head {
        table.add_row(Row::new(row.iter().map(|c| Cell::new(c)).collect()));
    }
    table
}

fn info_table(p: &TableProfile) -> Table {
    let mut table = new_table();
    table.set_titles(header_row(&["#", "Column", "Non-Null Count", "Dtype"]));
    for (i, c) in p.info.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&i.to_string()).style_spec("r"),
            Cell::new(&c.name),
            Cell::new(&format!("{} non-null", c.non_null)).style_spec("r"),
            Cell::new(&c.dtype),
        ]));
    }
    table
}

fn describe_table(summaries: &[NumericSummary]) -> Table {
    let mut table = new_table();
    let mut names = vec![""];
    names.extend(summaries.iter().map(|s| s.name.as_str()));
    table.set_titles(header_row(&names));

    let stats: [(&str, fn(&NumericSummary) -> String); 8] = [
        ("count", |s: &NumericSummary| format!("{:.6}", s.count as f64)),
        ("mean", |s: &NumericSummary| num(s.mean)),
        ("std", |s: &NumericSummary| num(s.std)),
        ("min", |s: &NumericSummary| num(s.min)),
        ("25%", |s: &NumericSummary| num(s.q25)),
        ("50%", |s: &NumericSummary| num(s.q50)),
        ("75%", |s: &NumericSummary| num(s.q75)),
        ("max", |s: &NumericSummary| num(s.max)),
    ];
    for (label, get) in stats {
        let mut cells = vec![Cell::new(label).style_spec("b")];
        cells.extend(summaries.iter().map(|s| Cell::new(&get(s)).style_spec("r")));
        table.add_row(Row::new(cells));
    }
    table
}

fn counts_table(title: &str, counts: &[(String, usize)]) -> Table {
    let mut table = new_table();
    table.set_titles(header_row(&["Column", title]));
    for (name, n) in counts {
        table.add_row(Row::new(vec![
            Cell::new(name),
            Cell::new(&n.to_string()).style_spec("r"),
        ]));
    }
    table
}

/// Render the whole profile as console text, one titled section per view.
pub fn render_profile(title: &str, p: &TableProfile) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n=== {} ===\n", title));
    out.push_str(&format!(
        "{} rows x {} columns\n",
        p.rows,
        p.headers.len()
    ));

    out.push_str("\n--- head ---\n");
    out.push_str(&head_table(p).to_string());
    out.push_str("\n--- info ---\n");
    out.push_str(&info_table(p).to_string());
    out.push_str("\n--- describe ---\n");
    if p.describe.is_empty() {
        out.push_str("(no numeric columns)\n");
    } else {
        out.push_str(&describe_table(&p.describe).to_string());
    }
    out.push_str("\n--- nunique ---\n");
    out.push_str(&counts_table("Distinct", &p.nunique).to_string());
    out.push_str("\n--- isna().sum() ---\n");
    out.push_str(&counts_table("Missing", &p.null_counts).to_string());
    out.push_str(&format!("\n--- duplicated().sum() ---\n{}\n", p.duplicated));
    out
}

pub fn print_profile(title: &str, p: &TableProfile) {
    print!("{}", render_profile(title, p));
}
