//! Interactive page view of a report using ratatui.

use crate::report::{FamilyValue, Report};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;

const WARN_PERCENT: f64 = 70.0;
const CRIT_PERCENT: f64 = 90.0;

/// Get color based on percentage value
fn percentage_color(value: f64) -> Color {
    if value >= CRIT_PERCENT {
        Color::Red
    } else if value >= WARN_PERCENT {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn percentage_span(value: f64) -> Span<'static> {
    let style = Style::default()
        .fg(percentage_color(value))
        .add_modifier(if value >= CRIT_PERCENT {
            Modifier::BOLD
        } else {
            Modifier::empty()
        });
    Span::styled(format!("{:.1}%", value), style)
}

fn header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<16}", label), Style::default().fg(Color::Gray)),
        Span::raw(value.into()),
    ])
}

fn percent_field(label: &str, value: f64) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<16}", label), Style::default().fg(Color::Gray)),
        percentage_span(value),
    ])
}

fn or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "n/a".to_string())
}

/// Flatten a report into display lines, one section per family.
pub fn page_lines(report: &Report) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (family, value) in report.iter() {
        lines.push(header(family.name()));
        match value {
            FamilyValue::Placeholder(text) => lines.push(Line::from(Span::styled(
                format!("  {}", text),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))),
            FamilyValue::Os(os) => {
                lines.push(field("System", os.system.as_str()));
                lines.push(field("Release", os.release.as_str()));
                lines.push(field("Version", os.version.as_str()));
                lines.push(field(
                    "Architecture",
                    format!("{} {}", os.architecture.0, os.architecture.1),
                ));
            }
            FamilyValue::Cpu(cpu) => {
                let count = |c: Option<usize>| c.map_or_else(|| "n/a".to_string(), |n| n.to_string());
                lines.push(field("Model", cpu.model.as_str()));
                lines.push(field("Physical cores", count(cpu.physical_cores)));
                lines.push(field("Logical cores", count(cpu.logical_cores)));
                lines.push(percent_field("Usage", cpu.usage));
            }
            FamilyValue::Memory(mem) => {
                lines.push(field("Total", mem.total.as_str()));
                lines.push(field("Available", mem.available.as_str()));
                lines.push(field("Used", mem.used.as_str()));
                lines.push(percent_field("Usage", mem.usage));
            }
            FamilyValue::Disk(disk) => {
                lines.push(field("Total", disk.total.as_str()));
                lines.push(field("Used", disk.used.as_str()));
                lines.push(field("Free", disk.free.as_str()));
                lines.push(percent_field("Usage", disk.usage));
            }
            FamilyValue::Partitions(partitions) => {
                if partitions.is_empty() {
                    lines.push(field("", "no partitions"));
                }
                for p in partitions {
                    let mut spans = vec![Span::raw(format!(
                        "  {} on {} ({}) {} / {} ",
                        p.device,
                        p.mountpoint,
                        p.fstype,
                        or_na(&p.used),
                        or_na(&p.total)
                    ))];
                    match p.usage {
                        Some(usage) => spans.push(percentage_span(usage)),
                        None => spans.push(Span::styled(
                            "unavailable",
                            Style::default().fg(Color::DarkGray),
                        )),
                    }
                    lines.push(Line::from(spans));
                }
            }
            FamilyValue::Network(net) => {
                lines.push(field("Hostname", net.hostname.as_str()));
                lines.push(field(
                    "IP address",
                    net.ip_address
                        .clone()
                        .unwrap_or_else(|| crate::report::UNAVAILABLE.to_string()),
                ));
            }
            FamilyValue::Interfaces(interfaces) => {
                for iface in interfaces {
                    let state = if iface.is_up {
                        Span::styled("up", Style::default().fg(Color::Green))
                    } else {
                        Span::styled("down", Style::default().fg(Color::Red))
                    };
                    let mut text = format!("  {:<10} {:<5} {}", iface.interface, iface.family, iface.address);
                    if let Some(netmask) = &iface.netmask {
                        text.push_str(&format!(" mask {}", netmask));
                    }
                    if let Some(broadcast) = &iface.broadcast {
                        text.push_str(&format!(" bcast {}", broadcast));
                    }
                    text.push(' ');
                    lines.push(Line::from(vec![Span::raw(text), state]));
                }
            }
            FamilyValue::Uptime(uptime) => {
                let [one, five, fifteen] = uptime.load_average;
                lines.push(field("Boot time", uptime.boot_time.as_str()));
                lines.push(field(
                    "Load average",
                    format!("{:.2} {:.2} {:.2}", one, five, fifteen),
                ));
            }
            FamilyValue::Battery(battery) => {
                lines.push(percent_field("Charge", battery.percentage));
                lines.push(field(
                    "Power",
                    if battery.plugged { "plugged in" } else { "on battery" },
                ));
                lines.push(field("Time left", battery.time_left.to_string()));
            }
            FamilyValue::Temperature(celsius) => {
                lines.push(field("Temperature", format!("{:.1} °C", celsius)));
            }
            FamilyValue::Gpu(gpus) => {
                for gpu in gpus {
                    lines.push(field("Device", gpu.as_str()));
                }
            }
        }
        lines.push(Line::default());
    }

    lines
}

/// Render help bar at the bottom
fn render_help_bar(f: &mut Frame, area: Rect, offset: u16, total: usize) {
    let text = format!(
        " q: Quit | j/k: Scroll | PgUp/PgDn: Page | line {}/{} ",
        usize::from(offset) + 1,
        total.max(1)
    );
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::Black).bg(Color::Gray));
    f.render_widget(paragraph, area);
}

/// Show the report in an alternate screen until the user quits.
pub fn run_page(report: &Report) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = page_loop(&mut terminal, page_lines(report));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn page_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    lines: Vec<Line<'static>>,
) -> Result<()> {
    let total = lines.len();
    let max_offset = u16::try_from(total.saturating_sub(1)).unwrap_or(u16::MAX);
    let mut offset: u16 = 0;
    let mut page: u16 = 1;

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(1)])
                .split(f.area());

            // Borders take two rows
            page = chunks[0].height.saturating_sub(2).max(1);

            let block = Block::default()
                .title(" System Information ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan));
            let paragraph = Paragraph::new(lines.clone())
                .block(block)
                .scroll((offset, 0));
            f.render_widget(paragraph, chunks[0]);
            render_help_bar(f, chunks[1], offset, total);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('j') | KeyCode::Down => offset = offset.saturating_add(1),
                KeyCode::Char('k') | KeyCode::Up => offset = offset.saturating_sub(1),
                KeyCode::PageDown | KeyCode::Char(' ') => offset = offset.saturating_add(page),
                KeyCode::PageUp => offset = offset.saturating_sub(page),
                KeyCode::Home | KeyCode::Char('g') => offset = 0,
                KeyCode::End | KeyCode::Char('G') => offset = max_offset,
                _ => {}
            }
            offset = offset.min(max_offset);
        }
    }

    Ok(())
}
