//! Askama templates for the board page.

use askama::Template;

use crate::board::{BoardView, DepartureRow};
use crate::weather::WeatherReport;

/// Seconds between browser reloads of the board page.
pub const PAGE_REFRESH_SECS: u32 = 5;

/// The board page.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub refresh_secs: u32,
    pub page: BoardPage,
    /// Footer copyright year.
    pub year: i32,
}

impl BoardTemplate {
    pub fn new(view: &BoardView, year: i32) -> Self {
        Self {
            refresh_secs: PAGE_REFRESH_SECS,
            page: BoardPage::from_view(view),
            year,
        }
    }
}

/// What the page body shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    /// A single centred message (loading, error, nothing to show).
    Message { text: String, is_error: bool },
    /// A departures table.
    Table,
}

/// Flattened board view for the template.
#[derive(Debug, Clone)]
pub struct BoardPage {
    pub body: PageBody,
    pub stop: String,
    /// "2 / 5"
    pub position: String,
    pub destination: Option<String>,
    pub rows: Vec<RowView>,
    pub show_countdown: bool,
    pub weather: Option<WeatherView>,
}

impl BoardPage {
    fn message(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            body: PageBody::Message {
                text: text.into(),
                is_error,
            },
            stop: String::new(),
            position: String::new(),
            destination: None,
            rows: Vec::new(),
            show_countdown: false,
            weather: None,
        }
    }

    pub fn from_view(view: &BoardView) -> Self {
        match view {
            BoardView::Loading { message } => Self::message(*message, false),
            BoardView::Error { message } => Self::message(*message, true),
            BoardView::Empty => Self::message("Brak przystanków", false),
            BoardView::Grouped {
                stop,
                position,
                destination,
                rows,
            } => Self {
                body: PageBody::Table,
                stop: stop.clone(),
                position: format!("{} / {}", position.page, position.pages),
                destination: destination.clone(),
                rows: rows.iter().map(RowView::from_row).collect(),
                show_countdown: false,
                weather: None,
            },
            BoardView::Countdown {
                stop,
                position,
                rows,
                weather,
            } => Self {
                body: PageBody::Table,
                stop: stop.clone(),
                position: format!("{} / {}", position.page, position.pages),
                destination: None,
                rows: rows.iter().map(RowView::from_row).collect(),
                show_countdown: true,
                weather: weather.as_ref().map(WeatherView::from_report),
            },
        }
    }

    pub fn is_table(&self) -> bool {
        self.body == PageBody::Table
    }

    pub fn message_text(&self) -> &str {
        match &self.body {
            PageBody::Message { text, .. } => text,
            PageBody::Table => "",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.body, PageBody::Message { is_error: true, .. })
    }
}

/// One table row.
#[derive(Debug, Clone)]
pub struct RowView {
    pub route: String,
    pub icon: &'static str,
    pub time: String,
    pub destination: String,
    /// "5 min", or "teraz" when due
    pub countdown: String,
}

impl RowView {
    fn from_row(row: &DepartureRow) -> Self {
        Self {
            route: row.route.clone(),
            icon: row.icon,
            time: row.time.clone(),
            destination: row.destination.clone(),
            countdown: match row.minutes_until {
                Some(0) => "teraz".to_string(),
                Some(m) => format!("{m} min"),
                None => String::new(),
            },
        }
    }
}

/// Weather readout.
#[derive(Debug, Clone)]
pub struct WeatherView {
    pub description: String,
    pub temperature: String,
}

impl WeatherView {
    fn from_report(report: &WeatherReport) -> Self {
        Self {
            description: report.description.clone(),
            temperature: report.temperature_display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ERROR_MESSAGE, LOADING_MESSAGE, PagePosition};
    use crate::domain::Mode;

    fn row(minutes_until: Option<u32>) -> DepartureRow {
        DepartureRow {
            route: "3".into(),
            mode: Mode::Tram,
            icon: Mode::Tram.icon(),
            destination: "Lotnisko".into(),
            time: "10:05".into(),
            minutes_until,
        }
    }

    #[test]
    fn countdown_text() {
        assert_eq!(RowView::from_row(&row(Some(0))).countdown, "teraz");
        assert_eq!(RowView::from_row(&row(Some(7))).countdown, "7 min");
        assert_eq!(RowView::from_row(&row(None)).countdown, "");
    }

    #[test]
    fn messages_for_non_ready_states() {
        let page = BoardPage::from_view(&BoardView::Error {
            message: ERROR_MESSAGE,
        });
        assert!(!page.is_table());
        assert_eq!(
            page.body,
            PageBody::Message {
                text: ERROR_MESSAGE.into(),
                is_error: true
            }
        );
    }

    #[test]
    fn grouped_page() {
        let page = BoardPage::from_view(&BoardView::Grouped {
            stop: "Rondo".into(),
            position: PagePosition { page: 2, pages: 5 },
            destination: Some("Lotnisko".into()),
            rows: vec![row(None)],
        });
        assert!(page.is_table());
        assert_eq!(page.position, "2 / 5");
        assert!(!page.show_countdown);
        assert_eq!(page.rows[0].icon, "icon-tram");
    }

    #[test]
    fn renders_loading_page() {
        let html = BoardTemplate::new(
            &BoardView::Loading {
                message: LOADING_MESSAGE,
            },
            2024,
        )
        .render()
        .unwrap();

        assert!(html.contains("Ładowanie danych..."));
        assert!(html.contains(r#"http-equiv="refresh" content="5""#));
        assert!(!html.contains("<table"));
        assert!(html.contains("© 2024 Rozkład Odjazdów"));
    }

    #[test]
    fn renders_countdown_table() {
        let html = BoardTemplate::new(
            &BoardView::Countdown {
                stop: "Dworzec Politechnika".into(),
                position: PagePosition { page: 1, pages: 1 },
                rows: vec![row(Some(4))],
                weather: Some(WeatherReport {
                    description: "słonecznie".into(),
                    temperature: 21.4,
                }),
            },
            2024,
        )
        .render()
        .unwrap();

        assert!(html.contains("Dworzec Politechnika"));
        assert!(html.contains("Rozkład Odjazdów"));
        assert!(html.contains("4 min"));
        assert!(html.contains("21°C"));
        assert!(html.contains("słonecznie"));
    }
}
