use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Error;
use crate::model::Mode;

pub struct SpinnerHelper;

impl SpinnerHelper {
  /// Spinner counting through `reports` downloads. Robot.XML output stays free of it.
  pub fn create(mode: Mode, reports: u64) -> Result<ProgressBar, Error> {
    if mode == Mode::RobotXml {
      return Ok(ProgressBar::hidden());
    }

    let spinner = ProgressBar::new(reports);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_style(
      ProgressStyle::default_spinner()
        .tick_strings(&[
          "□ □ □ □ □",
          "■ □ □ □ □",
          "□ ■ □ □ □",
          "□ □ ■ □ □",
          "□ □ □ ■ □",
          "□ □ □ □ ■",
          "■ ■ ■ ■ ■",
        ])
        .template("{spinner:.blue} [{pos}/{len}] {msg}")?,
    );
    Ok(spinner)
  }
}
