//! Three-step import wizard: select a file, preview the parsed rows, import
//! and report. Steps are linear; Esc from the preview discards everything
//! parsed, and the report step only closes.

use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::error::Result;
use crate::fmt::shekel;
use crate::importer::{log_import, parse_file, submit_candidates};
use crate::models::{BulkCreateReport, CostItemCandidate, Professional, Project};
use crate::settings::{open_configured_store, shellexpand_path};
use crate::store::Store;
use crate::tui::{wrap_text, ERROR_STYLE, FOOTER_STYLE, HEADER_STYLE, OK_STYLE, SELECTED_STYLE};

const FIELD_FILE: usize = 0;
const FIELD_PROFESSIONAL: usize = 1;

enum WizardAction {
    Continue,
    Close,
}

/// Each step owns its own state; moving back to Select starts from scratch.
enum Step {
    Select {
        file_path: String,
        professional_idx: usize,
        focused: usize,
        error: Option<String>,
    },
    Preview {
        file_path: PathBuf,
        professional_idx: usize,
        candidates: Vec<CostItemCandidate>,
        table_state: TableState,
        notice: Option<String>,
    },
    Importing {
        file_path: PathBuf,
        professional_idx: usize,
        candidates: Vec<CostItemCandidate>,
    },
    Report {
        report: BulkCreateReport,
        submitted: usize,
        log_error: Option<String>,
    },
}

impl Step {
    fn select() -> Step {
        Step::Select {
            file_path: String::new(),
            professional_idx: 0,
            focused: FIELD_FILE,
            error: None,
        }
    }

    fn number(&self) -> u8 {
        match self {
            Step::Select { .. } => 1,
            Step::Preview { .. } => 2,
            Step::Importing { .. } | Step::Report { .. } => 3,
        }
    }
}

struct WizardScreen {
    project: Project,
    professionals: Vec<Professional>,
    step: Step,
}

impl WizardScreen {
    fn new(project: Project, professionals: Vec<Professional>) -> Self {
        Self {
            project,
            professionals,
            step: Step::select(),
        }
    }

    /// Name shown in the professional selector; index 0 is "none".
    fn professional_label(&self, idx: usize) -> &str {
        if idx == 0 {
            "(none)"
        } else {
            &self.professionals[idx - 1].name
        }
    }

    fn professional_id(&self, idx: usize) -> Option<&str> {
        if idx == 0 {
            None
        } else {
            Some(self.professionals[idx - 1].id.as_str())
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, sep, content_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(
                " Import wizard: {} (step {}/3)",
                self.project.name,
                self.step.number()
            ))
            .style(HEADER_STYLE),
            header_area,
        );
        let sep_line = "\u{2501}".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(FOOTER_STYLE), sep);

        match &mut self.step {
            Step::Select { .. } => self.draw_select(frame, content_area, hints_area),
            Step::Preview { .. } => self.draw_preview(frame, content_area, hints_area),
            Step::Importing { candidates, .. } => {
                let valid = candidates.iter().filter(|c| c.is_valid()).count();
                frame.render_widget(
                    Paragraph::new(vec![
                        Line::from(""),
                        Line::from(format!("   Importing {valid} items...")),
                    ]),
                    content_area,
                );
            }
            Step::Report { .. } => self.draw_report(frame, content_area, hints_area),
        }
    }

    fn draw_select(&self, frame: &mut Frame, content_area: Rect, hints_area: Rect) {
        let Step::Select {
            file_path,
            professional_idx,
            focused,
            error,
        } = &self.step
        else {
            return;
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Select a Spreadsheet",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        let file_focused = *focused == FIELD_FILE;
        let cursor = if file_focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(
                "   File path      ",
                if file_focused {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                },
            ),
            Span::styled(
                format!("{file_path}{cursor}"),
                if file_focused { SELECTED_STYLE } else { Style::default() },
            ),
        ]));

        let prof_focused = *focused == FIELD_PROFESSIONAL;
        let arrows = if prof_focused { ("< ", " >") } else { ("  ", "  ") };
        lines.push(Line::from(vec![
            Span::styled(
                "   Professional   ",
                if prof_focused {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                },
            ),
            Span::styled(
                format!("{}{}{}", arrows.0, self.professional_label(*professional_idx), arrows.1),
                if prof_focused { SELECTED_STYLE } else { Style::default() },
            ),
        ]));

        if let Some(msg) = error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!("   {msg}"), ERROR_STYLE)));
        }

        frame.render_widget(Paragraph::new(lines), content_area);
        frame.render_widget(
            Paragraph::new(" Tab=fields  Left/Right=professional  Enter=parse  Esc=quit")
                .style(FOOTER_STYLE),
            hints_area,
        );
    }

    fn draw_preview(&mut self, frame: &mut Frame, content_area: Rect, hints_area: Rect) {
        let professional = match &self.step {
            Step::Preview { professional_idx, .. } => {
                self.professional_label(*professional_idx).to_string()
            }
            _ => return,
        };
        let Step::Preview {
            candidates,
            table_state,
            notice,
            ..
        } = &mut self.step
        else {
            return;
        };

        let [summary_area, table_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(content_area);

        let valid = candidates.iter().filter(|c| c.is_valid()).count();
        let invalid = candidates.len() - valid;
        let mut summary = vec![Line::from(vec![
            Span::raw(" "),
            Span::styled(format!(" {valid} valid "), OK_STYLE),
            Span::raw("  "),
            Span::styled(format!(" {invalid} with errors "), ERROR_STYLE),
            Span::raw(format!("   {} total   professional: {}", candidates.len(), professional)),
        ])];
        if let Some(msg) = notice {
            summary.push(Line::from(Span::styled(format!("   {msg}"), ERROR_STYLE)));
        }
        frame.render_widget(Paragraph::new(summary), summary_area);

        let rows: Vec<Row> = candidates
            .iter()
            .map(|c| {
                let status = if c.is_valid() {
                    Cell::from(Span::styled("ok", OK_STYLE))
                } else {
                    Cell::from(Span::styled(c.errors.join("; "), ERROR_STYLE))
                };
                Row::new(vec![
                    Cell::from(c.row_index.to_string()),
                    Cell::from(c.name.clone()),
                    Cell::from(c.category.label()),
                    Cell::from(shekel(c.estimated_amount)),
                    Cell::from(c.actual_amount.map(shekel).unwrap_or_default()),
                    Cell::from(if c.vat_included { "incl" } else { "excl" }),
                    status,
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(4),
            Constraint::Length(24),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Fill(1),
        ];
        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["#", "Name", "Category", "Estimated", "Actual", "VAT", "Status"])
                    .style(HEADER_STYLE),
            )
            .row_highlight_style(SELECTED_STYLE);
        frame.render_stateful_widget(table, table_area, table_state);

        frame.render_widget(
            Paragraph::new(" Up/Down=scroll  Enter=import valid rows  Esc=back").style(FOOTER_STYLE),
            hints_area,
        );
    }

    fn draw_report(&self, frame: &mut Frame, content_area: Rect, hints_area: Rect) {
        let Step::Report {
            report,
            submitted,
            log_error,
        } = &self.step
        else {
            return;
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Import Result",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("   Created {} of {} items", report.success, submitted),
                if report.errors.is_empty() { OK_STYLE } else { ERROR_STYLE },
            )),
        ];
        let wrap_width = (frame.area().width as usize).saturating_sub(6);
        for e in &report.errors {
            let (wrapped, _) = wrap_text(
                &format!("row {} ({}): {}", e.index + 1, e.name, e.error),
                wrap_width,
            );
            for line in wrapped.lines() {
                lines.push(Line::from(Span::styled(format!("   {line}"), ERROR_STYLE)));
            }
        }
        if let Some(msg) = log_error {
            lines.push(Line::from(Span::styled(
                format!("   Import log not written: {msg}"),
                ERROR_STYLE,
            )));
        }

        frame.render_widget(Paragraph::new(lines), content_area);
        frame.render_widget(Paragraph::new(" Any key=close").style(FOOTER_STYLE), hints_area);
    }

    fn handle_key(&mut self, code: KeyCode) -> WizardAction {
        match &mut self.step {
            Step::Select { .. } => self.handle_select_key(code),
            Step::Preview { .. } => self.handle_preview_key(code),
            // keys are ignored while the submit call runs
            Step::Importing { .. } => WizardAction::Continue,
            Step::Report { .. } => WizardAction::Close,
        }
    }

    fn handle_select_key(&mut self, code: KeyCode) -> WizardAction {
        let professional_count = self.professionals.len();
        let Step::Select {
            file_path,
            professional_idx,
            focused,
            error,
        } = &mut self.step
        else {
            return WizardAction::Continue;
        };

        match code {
            KeyCode::Esc => return WizardAction::Close,
            KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
                *focused = if *focused == FIELD_FILE {
                    FIELD_PROFESSIONAL
                } else {
                    FIELD_FILE
                };
            }
            KeyCode::Left => {
                if *focused == FIELD_PROFESSIONAL {
                    *professional_idx = if *professional_idx == 0 {
                        professional_count
                    } else {
                        *professional_idx - 1
                    };
                }
            }
            KeyCode::Right => {
                if *focused == FIELD_PROFESSIONAL {
                    *professional_idx = (*professional_idx + 1) % (professional_count + 1);
                }
            }
            KeyCode::Char(c) => {
                if *focused == FIELD_FILE {
                    file_path.push(c);
                }
                *error = None;
            }
            KeyCode::Backspace => {
                if *focused == FIELD_FILE {
                    file_path.pop();
                }
                *error = None;
            }
            KeyCode::Enter => {
                let chosen_idx = *professional_idx;
                let path_str = file_path.trim().to_string();
                if path_str.is_empty() {
                    *error = Some("File path is required".to_string());
                    return WizardAction::Continue;
                }
                let path = PathBuf::from(shellexpand_path(&path_str));
                if !path.exists() {
                    *error = Some(format!("File not found: {}", path.display()));
                    return WizardAction::Continue;
                }
                match parse_file(&path) {
                    Err(e) => {
                        *error = Some(e.to_string());
                    }
                    Ok(candidates) => {
                        self.step = Step::Preview {
                            file_path: path,
                            professional_idx: chosen_idx,
                            candidates,
                            table_state: TableState::default().with_selected(0),
                            notice: None,
                        };
                    }
                }
            }
            _ => {}
        }
        WizardAction::Continue
    }

    fn handle_preview_key(&mut self, code: KeyCode) -> WizardAction {
        let Step::Preview {
            candidates,
            table_state,
            notice,
            ..
        } = &mut self.step
        else {
            return WizardAction::Continue;
        };

        match code {
            // back: drop the parsed rows and the chosen file
            KeyCode::Esc => {
                self.step = Step::select();
            }
            KeyCode::Down => {
                let selected = table_state.selected().unwrap_or(0);
                table_state.select(Some((selected + 1).min(candidates.len().saturating_sub(1))));
            }
            KeyCode::Up => {
                let selected = table_state.selected().unwrap_or(0);
                table_state.select(Some(selected.saturating_sub(1)));
            }
            KeyCode::Enter => {
                if candidates.iter().any(|c| c.is_valid()) {
                    if let Step::Preview {
                        file_path,
                        professional_idx,
                        candidates,
                        ..
                    } = std::mem::replace(&mut self.step, Step::select())
                    {
                        self.step = Step::Importing {
                            file_path,
                            professional_idx,
                            candidates,
                        };
                    }
                } else {
                    *notice = Some("No valid rows to import".to_string());
                }
            }
            _ => {}
        }
        WizardAction::Continue
    }

    /// Runs the blocking submit call. The caller draws the Importing frame
    /// first, so the busy indicator is on screen while this runs.
    fn run_import(&mut self, store: &mut dyn Store) {
        let Step::Importing {
            file_path,
            professional_idx,
            candidates,
        } = std::mem::replace(&mut self.step, Step::select())
        else {
            return;
        };

        let submitted = candidates.iter().filter(|c| c.is_valid()).count();
        let report = submit_candidates(store, &self.project, &candidates);
        let log_error = log_import(
            store,
            &file_path,
            &self.project,
            self.professional_id(professional_idx),
            candidates.len(),
            report.success,
        )
        .err()
        .map(|e| e.to_string());

        self.step = Step::Report {
            report,
            submitted,
            log_error,
        };
    }
}

pub fn run(project_name: &str) -> Result<()> {
    let (_settings, mut store) = open_configured_store()?;
    let project = store.get_project(project_name)?;
    let professionals = store.list_professionals()?;
    let mut screen = WizardScreen::new(project, professionals);

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| screen.draw(frame)) {
            break Err(e.into());
        }

        if matches!(screen.step, Step::Importing { .. }) {
            screen.run_import(store.as_mut());
            continue;
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break Ok(());
                }
                match screen.handle_key(key.code) {
                    WizardAction::Close => break Ok(()),
                    WizardAction::Continue => {}
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}
