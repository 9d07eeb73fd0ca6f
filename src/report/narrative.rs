//! Plain-text analytical summary

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};

use crate::pipeline::ModelEvaluation;

/// Fixed interpretation of the survey findings; not derived from the data
pub const HCI_NARRATIVE: &str = "\
### Behavioral Insights and HCI Interpretation

1. **Consumer Behavior Trends:**
   Purchasing decisions in the sample lean on external triggers such as
   discounts, stock availability and what peers are buying. Willingness to
   buy moves with these stimuli, which fits the view that sudden outside
   events shape online purchase decisions.

2. **Online vs. Offline Shopping:**
   The logistic regression suggests that a preference for online shopping is
   modestly predicted by digital trust, consistent product quality and
   exposure to online promotions. A sizeable group still prefers physical
   stores, pointing to usability, trust and the sensory experience as
   remaining barriers.

3. **Relation to Human-Computer Interaction (HCI):**
   - **Usability & Trust:** interfaces that feel unintuitive or insecure hold
     back adoption.
   - **Cognitive Load:** long checkouts, unclear navigation and weak feedback
     discourage repeat purchases.
   - **Experience Gap:** missing tactile and social cues lower satisfaction.
   - **Design Implication:** e-commerce interfaces should favour clarity,
     accessibility, responsive layouts and personalisation.

4. **Conclusion:**
   Discounts and convenience pull consumers toward online channels, while the
   interaction quality of e-commerce platforms decides long-term trust and
   preference.
";

/// Narrative followed by the numbers behind it
pub fn render_summary(evaluation: &ModelEvaluation, top: usize) -> Result<String> {
    let mut text = String::from(HCI_NARRATIVE);
    write_results(&mut text, evaluation, top).context("Failed to format model results")?;
    Ok(text)
}

fn write_results(out: &mut String, evaluation: &ModelEvaluation, top: usize) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "### Model Results")?;
    writeln!(out)?;
    writeln!(out, "Target column: {}", evaluation.target)?;
    writeln!(
        out,
        "Rows: {} train / {} test",
        evaluation.train_rows, evaluation.test_rows
    )?;
    writeln!(out, "Accuracy: {:.4}", evaluation.report.accuracy)?;
    for class in &evaluation.report.classes {
        writeln!(
            out,
            "Class {}: precision {:.2}, recall {:.2}, f1 {:.2}, support {}",
            class.label, class.precision, class.recall, class.f1, class.support
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Top {} features by |coefficient|:", top)?;
    for (rank, entry) in evaluation.ranking.iter().take(top).enumerate() {
        writeln!(out, "{:>3}. {} ({:.4})", rank + 1, entry.feature, entry.importance)?;
    }
    Ok(())
}

/// Write the summary, replacing any previous file
pub fn write_summary(evaluation: &ModelEvaluation, top: usize, path: &Path) -> Result<()> {
    std::fs::write(path, render_summary(evaluation, top)?)
        .with_context(|| format!("Failed to write summary to {}", path.display()))
}
