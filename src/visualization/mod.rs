pub mod text_plots;

pub use text_plots::{plot_rewards, plot_series};
