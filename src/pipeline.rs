use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    error::Result,
    field::GrayscaleField,
    mask::{
        MaskGenerator,
        compose::{compose, removal_ratio},
        letter::LetterMask,
    },
    panel::{PANEL_LABELS, Panel, assemble},
};

/// summary of a finished figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub output_path: PathBuf,
    pub total_ink_samples: usize,
    pub removed_ink_samples: usize,
}

impl Report {
    /// share of the stipples that the letter removed, `0.0` when there were none.
    pub fn removal_ratio(&self) -> f64 {
        removal_ratio(self.removed_ink_samples, self.total_ink_samples)
    }
}

/// Runs letter rasterization, masking and panel assembly in order.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the four labeled panels without writing anything. the letter mask is drawn at the
    /// stippled field's shape.
    pub fn panels(
        &self,
        original: &GrayscaleField,
        stippled: &GrayscaleField,
    ) -> Result<(Vec<Panel>, Report)> {
        let (height, width) = stippled.shape();

        log::info!("Rasterizing letter {:?} at {}x{}", self.config.letter, height, width);
        let generator = LetterMask {
            letter: self.config.letter,
            size_ratio: self.config.font_size_ratio,
            fonts: self.config.font_chain(),
        };
        let mask = generator.mask(height, width)?;

        log::info!("Applying mask with threshold {}", self.config.threshold);
        let composition = compose(stippled, &mask, self.config.threshold)?;

        let report = Report {
            output_path: PathBuf::new(),
            total_ink_samples: composition.total_ink_samples,
            removed_ink_samples: composition.removed_ink_samples,
        };

        let fields = [original.clone(), stippled.clone(), mask, composition.output];
        let panels = fields
            .into_iter()
            .zip(PANEL_LABELS)
            .map(|(field, label)| Panel::new(field, label))
            .collect();

        Ok((panels, report))
    }

    pub fn run(
        &self,
        original: &GrayscaleField,
        stippled: &GrayscaleField,
        output_path: impl AsRef<Path>,
    ) -> Result<Report> {
        let output_path = output_path.as_ref();
        let (panels, report) = self.panels(original, stippled)?;

        log::info!("Assembling {} panels into {:?}", panels.len(), output_path);
        assemble(&panels, output_path, &self.config.panel_style()?)?;

        Ok(Report {
            output_path: output_path.to_path_buf(),
            ..report
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        mask::{BLANK, compose::DEFAULT_THRESHOLD},
    };

    fn config() -> Config {
        Config {
            font_candidates: Vec::new(),
            dpi: 20,
            ..Default::default()
        }
    }

    #[test]
    fn panels_come_out_in_order() {
        let original = GrayscaleField::filled(30, 30, 0.5);
        let stippled = GrayscaleField::filled(30, 30, 0.);

        let pipeline = Pipeline::new(config()).unwrap();
        let (panels, report) = pipeline.panels(&original, &stippled).unwrap();

        let labels: Vec<_> = panels.iter().map(|panel| panel.label.as_str()).collect();
        assert_eq!(labels, PANEL_LABELS);
        assert_eq!(panels[0].field, original);
        assert_eq!(panels[1].field, stippled);
        assert_eq!(report.total_ink_samples, 900);
        assert!(report.removed_ink_samples > 0);
        // the estimate is blank exactly where the letter is dark
        for (m, e) in panels[2].field.as_array().iter().zip(panels[3].field.as_array()) {
            assert_eq!(*m < 0.5, *e == BLANK);
        }
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = Config {
            dpi: 0,
            ..config()
        };
        assert!(matches!(Pipeline::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn report_ratio_handles_no_ink() {
        let report = Report {
            output_path: PathBuf::new(),
            total_ink_samples: 0,
            removed_ink_samples: 0,
        };
        assert_eq!(report.removal_ratio(), 0.0);
    }

    #[test]
    fn report_ratio_matches_the_composition() {
        let stippled = GrayscaleField::filled(30, 30, 0.);
        let pipeline = Pipeline::new(config()).unwrap();
        let (panels, report) = pipeline.panels(&stippled, &stippled).unwrap();

        let composition = compose(&stippled, &panels[2].field, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(report.removal_ratio(), composition.removal_ratio());
        assert!(report.removal_ratio() > 0.0);
    }
}
