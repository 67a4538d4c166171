use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use user_directory_core::utils::truncate;
use user_directory_core::UserCard;

use crate::app::{App, AppState};

use super::screen::ListRegion;
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let screen = app.screen();

    let mut constraints = vec![
        Constraint::Length(2), // Title bar
        Constraint::Length(2), // Controls
    ];
    if screen.banner.is_some() {
        constraints.push(Constraint::Length(1));
    }
    if screen.error.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(5)); // User list
    constraints.push(Constraint::Length(1)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut next = 0;
    let mut take = || {
        let area = chunks[next];
        next += 1;
        area
    };

    render_title_bar(frame, app, take());
    render_controls(frame, app, take());
    if let Some(ref banner) = screen.banner {
        render_banner(frame, banner, take());
    }
    if let Some(ref error) = screen.error {
        render_error(frame, error, take());
    }
    render_user_list(frame, app, take());
    render_status_bar(frame, app, take());

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Diretório de Usuários";
    let status = app.screen().status;
    let status_text = format!("● {}", status.label());
    let help_hint = "[?] Ajuda";

    let used = title.chars().count() + status_text.chars().count() + help_hint.chars().count() + 5;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(status_text, styles::connection_style(status)),
        Span::raw("   "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let screen = app.screen();
    let searching = matches!(app.state, AppState::Searching);
    let query = app.directory.state().query();

    let trigger = if screen.trigger_busy {
        Span::styled("[r] Carregando...", styles::muted_style())
    } else {
        Span::styled("[r] Carregar Usuários", styles::help_key_style())
    };

    let search_label_style = if searching {
        styles::search_style()
    } else {
        styles::muted_style()
    };
    let cursor = if searching { "▌" } else { "" };

    let line = Line::from(vec![
        Span::raw(" "),
        trigger,
        Span::styled(" | ", styles::muted_style()),
        Span::styled("[c] Limpar", styles::help_key_style()),
        Span::styled(" | ", styles::muted_style()),
        Span::styled("[/] Buscar: ", search_label_style),
        Span::styled(format!("{}{}", query, cursor), styles::search_style()),
        Span::styled(" | ", styles::muted_style()),
        Span::styled("[s] Ordenar: ", styles::muted_style()),
        Span::styled(
            app.directory.state().sort_key().label(),
            styles::highlight_style(),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_banner(frame: &mut Frame, banner: &str, area: Rect) {
    let line = Line::from(Span::styled(format!(" ℹ {}", banner), styles::info_style()));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let line = Line::from(vec![
        Span::styled(message, styles::error_style()),
        Span::raw("  "),
        Span::styled("[t] Tentar novamente", styles::help_key_style()),
    ]);

    let block = Block::default()
        .title(" Erro ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_user_list(frame: &mut Frame, app: &App, area: Rect) {
    let screen = app.screen();

    let mut title = format!(" Usuários ({}) ", screen.list.len());
    if screen.loading {
        title.push_str("- Carregando... ");
    }

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(!matches!(app.state, AppState::Searching)));

    match screen.list {
        ListRegion::Empty(empty) => {
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(empty.message(), styles::muted_style())),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(paragraph, area);
        }
        ListRegion::Users(ref cards) => {
            let items: Vec<ListItem> = cards.iter().map(user_item).collect();
            let list = List::new(items)
                .block(block)
                .style(styles::list_item_style())
                .highlight_style(styles::selected_style());

            let mut state = ListState::default();
            state.select(Some(app.selection));
            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn user_item(card: &UserCard) -> ListItem<'static> {
    let indent = " ".repeat(card.initials.chars().count() + 4);

    let text = Text::from(vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(format!(" {} ", card.initials), styles::avatar_style()),
            Span::raw(" "),
            Span::styled(card.name.clone(), styles::title_style()),
            Span::raw("  "),
            Span::styled(card.email.clone(), styles::muted_style()),
        ]),
        Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled("Empresa: ", styles::muted_style()),
            Span::raw(card.company.clone()),
            Span::styled("   Local: ", styles::muted_style()),
            Span::raw(card.location.clone()),
        ]),
        Line::from(vec![
            Span::raw(indent),
            Span::styled("Telefone: ", styles::muted_style()),
            Span::raw(card.phone.clone()),
            Span::styled("   Site: ", styles::muted_style()),
            Span::raw(card.website.clone()),
        ]),
    ]);

    ListItem::new(text)
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let screen = app.screen();
    let left_text = format!(" {} · {} ", screen.count, screen.last_update);
    let right_text = " [q] Sair ";

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc.to_string(), styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(56, 20, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(" Diretório de Usuários", styles::title_style())),
        Line::from(Span::styled(format!(" versão {}", version), styles::muted_style())),
        Line::from(Span::styled(
            format!(" {}", truncate(app.config.api_url(), 52)),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Ações", styles::highlight_style())),
        help_line("r", "Carregar usuários"),
        help_line("t", "Tentar novamente após um erro"),
        help_line("c", "Limpar usuários e cache local"),
        help_line("/", "Buscar por nome, e-mail ou empresa"),
        help_line("s / S", "Próxima / anterior ordenação"),
        Line::from(""),
        Line::from(Span::styled(" Navegação", styles::highlight_style())),
        help_line("↑/↓ j/k", "Mover seleção"),
        help_line("PgUp/PgDn", "Rolar página"),
        help_line("q", "Sair"),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Pressione ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" ou ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" para fechar", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
