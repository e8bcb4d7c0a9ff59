use crate::packer::Plank;

const MAX_WIDTH: f64 = 80.0;

/// Draws one plank as a bar scaled to fit the terminal, e.g.
/// `|  800  |  800  |  800  |///|`. Waste is hatched. A cut repeated too
/// often to draw one by one is drawn once, labelled `10x500`.
pub fn render_plank(plank_length: u64, plank: &Plank) -> String {
    if plank_length == 0 {
        return String::new();
    }
    let scale = MAX_WIDTH / plank_length as f64;

    let mut bar = String::from("|");
    for cut in &plank.cuts {
        let label = cut.length.to_string();
        let cells = ((cut.length as f64 * scale).round() as usize).max(1);
        if cut.quantity.saturating_mul(cells as u64) > MAX_WIDTH as u64 {
            let cells = (cut.length as f64 * cut.quantity as f64 * scale)
                .round()
                .clamp(1.0, MAX_WIDTH) as usize;
            bar.push_str(&segment(&format!("{}x{}", label, cut.quantity), cells, ' '));
            bar.push('|');
            continue;
        }
        for _ in 0..cut.quantity {
            bar.push_str(&segment(&label, cells, ' '));
            bar.push('|');
        }
    }

    let waste_cells = (plank.waste as f64 * scale).round() as usize;
    if waste_cells > 0 {
        bar.push_str(&"/".repeat(waste_cells));
        bar.push('|');
    }
    bar.push('\n');
    bar
}

/// Centres `label` in `cells` characters, dropping it if it does not fit.
fn segment(label: &str, cells: usize, fill: char) -> String {
    let len = label.chars().count();
    if len > cells {
        return std::iter::repeat_n(fill, cells).collect();
    }
    let left = (cells - len) / 2;
    let right = cells - len - left;
    let mut s = String::with_capacity(cells);
    s.extend(std::iter::repeat_n(fill, left));
    s.push_str(label);
    s.extend(std::iter::repeat_n(fill, right));
    s
}
