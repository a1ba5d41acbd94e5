use crate::metrics::TrainingHistory;

/// ASCII reward-per-episode curve of a training run.
pub fn plot_rewards(history: &TrainingHistory, width: usize, height: usize) -> String {
    if history.episodes.is_empty() {
        return "No reward data available".to_string();
    }
    plot_series(&history.rewards(), "Episode Rewards", width, height)
}

/// Plots `values` against their index as ASCII art.
pub fn plot_series(values: &[f32], title: &str, width: usize, height: usize) -> String {
    if values.is_empty() || width < 10 || height < 5 {
        return format!("{}: Invalid data or dimensions", title);
    }

    let min_val = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if (max_val - min_val).abs() < f32::EPSILON {
        return format!("{}: All values are {:.4}", title, min_val);
    }

    let mut plot = vec![vec![' '; width]; height];

    for row in plot.iter_mut() {
        row[0] = '|';
    }
    for cell in plot[height - 1].iter_mut() {
        *cell = '-';
    }
    plot[height - 1][0] = '+';

    let x_span = (width - 3) as f32;
    let y_span = (height - 2) as f32;
    let last = (values.len() - 1).max(1) as f32;

    for (i, &value) in values.iter().enumerate() {
        let x = ((i as f32 / last * x_span) as usize + 2).min(width - 1);
        let level = ((value - min_val) / (max_val - min_val) * (y_span - 1.0)).round() as usize;
        let y = (height - 2).saturating_sub(level);
        plot[y][x] = '*';
    }

    let mut output = format!("{}\n", title);
    output.push_str(&format!("Max: {:.4}\n", max_val));
    for row in plot.iter() {
        output.push_str(&row.iter().collect::<String>());
        output.push('\n');
    }
    output.push_str(&format!("Min: {:.4}\n", min_val));
    output.push_str(&format!("Points: {}\n", values.len()));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_marks_every_point() {
        let plot = plot_series(&[0.0, 1.0, 2.0], "Rewards", 20, 6);
        assert_eq!(plot.matches('*').count(), 3);
        assert!(plot.starts_with("Rewards\nMax: 2.0000"));
        assert!(plot.contains("Points: 3"));
    }

    #[test]
    fn test_plot_degenerate_inputs() {
        assert_eq!(plot_series(&[], "R", 20, 6), "R: Invalid data or dimensions");
        assert_eq!(plot_series(&[1.0, 1.0], "R", 20, 6), "R: All values are 1.0000");
        assert_eq!(plot_rewards(&TrainingHistory::new(), 20, 6), "No reward data available");
    }
}
