//! Plain-text rendering of a `Screen` for the terminal shell.

use std::fmt;

use crate::charts::{ChartSeries, HeatmapGrid, ScatterSeries};
use crate::pages::{PageState, Section, Severity};
use crate::shell::{Body, Screen};

const BAR_WIDTH: usize = 30;
const MAX_SCATTER_POINTS: usize = 10;

pub fn render(screen: &Screen) -> String {
    Rendered(screen).to_string()
}

struct Rendered<'a>(&'a Screen);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let screen = self.0;
        write_header(f, screen)?;
        match &screen.body {
            Body::NotFound(path) => {
                writeln!(f, "Page not found: {}", path)?;
                writeln!(f, "Use one of the links above.")
            }
            Body::Page(PageState::Loading) => writeln!(f, "Loading..."),
            Body::Page(PageState::Failed { heading, message, hint }) => {
                writeln!(f, "{}", heading)?;
                writeln!(f, "  {}", message)?;
                writeln!(f, "  {}", hint)
            }
            Body::Page(PageState::Ready(view)) => {
                writeln!(f, "{}", view.title)?;
                writeln!(f, "{}", "=".repeat(view.title.chars().count()))?;
                if let Some(question) = &view.question {
                    writeln!(f, "{}", question)?;
                }
                for section in &view.sections {
                    writeln!(f)?;
                    write_section(f, section)?;
                }
                Ok(())
            }
        }
    }
}

fn write_header(f: &mut fmt::Formatter<'_>, screen: &Screen) -> fmt::Result {
    let links: Vec<String> = screen
        .nav
        .iter()
        .map(|item| {
            if item.active {
                format!("[{}]", item.label)
            } else {
                item.label.to_string()
            }
        })
        .collect();
    writeln!(f, "{} | {}", screen.title, links.join(" | "))?;
    writeln!(f)
}

fn write_section(f: &mut fmt::Formatter<'_>, section: &Section) -> fmt::Result {
    match section {
        Section::Alert { severity, title, lines } => {
            let tag = match severity {
                Severity::Info => "INFO",
                Severity::Warning => "WARNING",
            };
            match title {
                Some(title) => writeln!(f, "[{}] {}:", tag, title)?,
                None => writeln!(f, "[{}]", tag)?,
            }
            for line in lines {
                writeln!(f, "  {}", line)?;
            }
            Ok(())
        }
        Section::Cards(cards) => {
            for card in cards {
                writeln!(f, "{:<15} {}", card.label, card.value)?;
            }
            Ok(())
        }
        Section::Bar { title, axes, series } | Section::Line { title, axes, series } => {
            writeln!(f, "{} ({} / {})", title, axes.x, axes.y)?;
            write_series(f, series)
        }
        Section::Scatter { title, axes, series } => {
            writeln!(f, "{} ({} vs {})", title, axes.x, axes.y)?;
            write_scatter(f, series)
        }
        Section::Heatmap { title, grid } => {
            writeln!(f, "{}", title)?;
            write_heatmap(f, grid)
        }
        Section::Bullets { title, items } => {
            writeln!(f, "{}", title)?;
            for item in items {
                writeln!(f, "  - {}", item)?;
            }
            Ok(())
        }
        Section::Paragraph { title, text } => {
            if let Some(title) = title {
                writeln!(f, "{}", title)?;
            }
            writeln!(f, "{}", text)
        }
    }
}

fn write_series(f: &mut fmt::Formatter<'_>, series: &ChartSeries) -> fmt::Result {
    let label_width = series
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);

    // A single dataset gets a bar scaled to its largest value
    if let [dataset] = series.datasets.as_slice() {
        let max = dataset.values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        for (label, value) in series.labels.iter().zip(&dataset.values) {
            let len = if max > 0.0 {
                ((value.abs() / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            writeln!(
                f,
                "  {:<width$} {:<bar$} {:.2}",
                label,
                "#".repeat(len),
                value,
                width = label_width,
                bar = BAR_WIDTH
            )?;
        }
        return Ok(());
    }

    let names: Vec<&str> = series.datasets.iter().map(|d| d.label.as_str()).collect();
    writeln!(f, "  {:<width$} {}", "", names.join(" | "), width = label_width)?;
    for (idx, label) in series.labels.iter().enumerate() {
        let values: Vec<String> = series
            .datasets
            .iter()
            .map(|d| d.values.get(idx).map(|v| format!("{:.2}", v)).unwrap_or_default())
            .collect();
        writeln!(f, "  {:<width$} {}", label, values.join(" | "), width = label_width)?;
    }
    Ok(())
}

fn write_scatter(f: &mut fmt::Formatter<'_>, series: &ScatterSeries) -> fmt::Result {
    for dataset in &series.datasets {
        writeln!(f, "  {} ({} points)", dataset.label, dataset.points.len())?;
        for point in dataset.points.iter().take(MAX_SCATTER_POINTS) {
            writeln!(f, "    ({:.2}, {:.2})", point.x, point.y)?;
        }
        if dataset.points.len() > MAX_SCATTER_POINTS {
            writeln!(f, "    ...")?;
        }
    }
    Ok(())
}

fn write_heatmap(f: &mut fmt::Formatter<'_>, grid: &HeatmapGrid) -> fmt::Result {
    writeln!(f, "  {:<4} {}", "", grid.column_labels.join(" "))?;
    for (label, row) in grid.row_labels.iter().zip(&grid.cells) {
        let cells: Vec<String> = row.iter().map(|v| format!("{:.0}", v)).collect();
        writeln!(f, "  {:<4} {}", label, cells.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{Color, Dataset, DatasetStyle};
    use crate::pages::PageView;
    use crate::router::{header, Route, APP_TITLE};

    fn screen(body: Body) -> Screen {
        Screen {
            title: APP_TITLE,
            nav: header(Some(Route::Question1)),
            body,
        }
    }

    #[test]
    fn test_header_marks_active_link() {
        let text = render(&screen(Body::Page(PageState::Loading)));
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("NYC TLC Analytics | Overview | [Q1: Revenue Zones]"));
        assert!(text.contains("Loading..."));
    }

    #[test]
    fn test_failed_page_shows_message_and_hint() {
        let text = render(&screen(Body::Page(PageState::failed(
            "Error loading overview data",
            "request failed with status 500",
            "http://localhost:8000",
        ))));
        assert!(text.contains("Error loading overview data"));
        assert!(text.contains("request failed with status 500"));
        assert!(text.contains("Please ensure the backend API is running at http://localhost:8000"));
    }

    #[test]
    fn test_single_dataset_bar() {
        let view = PageView {
            title: "Q".to_string(),
            question: None,
            sections: vec![Section::bar(
                "Revenue",
                "Zone ID",
                "Revenue ($)",
                ChartSeries {
                    labels: vec!["Zone 1".to_string(), "Zone 2".to_string()],
                    datasets: vec![Dataset::new(
                        "Total Revenue",
                        vec![100.0, 50.0],
                        DatasetStyle::solid(Color::Blue),
                    )],
                },
            )],
        };
        let text = render(&screen(Body::Page(PageState::Ready(view))));
        let bar_line = text.lines().find(|l| l.contains("Zone 2")).unwrap();
        assert_eq!(bar_line.matches('#').count(), BAR_WIDTH / 2);
        assert!(bar_line.ends_with("50.00"));
    }

    #[test]
    fn test_not_found() {
        let text = render(&Screen {
            title: APP_TITLE,
            nav: header(None),
            body: Body::NotFound("/nope".to_string()),
        });
        assert!(text.contains("Page not found: /nope"));
        assert!(!text.contains('['));
    }
}
