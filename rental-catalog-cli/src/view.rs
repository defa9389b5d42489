//! View 层：把页面快照渲染成纯文本

use std::fmt::Write;

use rental_catalog_api::{
    ActorDetail, ActorSummary, Customer, CustomerDetails, FilmDetail, FilmSummary,
};
use rental_catalog_core::{
    ActorsSnapshot, CustomerDraft, CustomersSnapshot, DetailState, FilmsSnapshot, ListSnapshot,
    ListView, ModalKind,
};

pub fn films(snap: &FilmsSnapshot) -> String {
    let mut out = String::new();
    list(&mut out, "Films", &snap.list, film_row);
    match snap.modal {
        ModalKind::ViewDetails => {
            detail(&mut out, &snap.detail, film_detail);
            let _ = writeln!(out, "  rent to customer id: [{}]", snap.rent.customer_id);
            if let Some(error) = &snap.rent.error {
                let _ = writeln!(out, "  ! {error}");
            }
        }
        other => modal_banner(&mut out, other),
    }
    notice(&mut out, snap.notice.as_deref());
    out
}

pub fn actors(snap: &ActorsSnapshot) -> String {
    let mut out = String::new();
    list(&mut out, "Actors", &snap.list, actor_row);
    if snap.modal == ModalKind::ViewDetails {
        detail(&mut out, &snap.detail, actor_detail);
    }
    out
}

pub fn customers(snap: &CustomersSnapshot) -> String {
    let mut out = String::new();
    list(&mut out, "Customers", &snap.list, customer_row);
    match snap.modal {
        ModalKind::None => {}
        ModalKind::ViewDetails => detail(&mut out, &snap.detail, customer_detail),
        ModalKind::Create => {
            let _ = writeln!(out, "-- new customer (set <field> <value>, confirm, close) --");
            draft(&mut out, snap.draft.as_ref());
        }
        ModalKind::Edit => {
            let _ = writeln!(
                out,
                "-- edit customer {} (set <field> <value>, confirm, close) --",
                snap.target.unwrap_or_default()
            );
            draft(&mut out, snap.draft.as_ref());
        }
        ModalKind::Delete => {
            let _ = writeln!(
                out,
                "-- delete customer {}? (confirm, close) --",
                snap.target.unwrap_or_default()
            );
        }
    }
    if let Some(error) = &snap.error {
        let _ = writeln!(out, "  ! {error}");
    }
    notice(&mut out, snap.notice.as_deref());
    out
}

fn list<T>(out: &mut String, title: &str, snap: &ListSnapshot<T>, row: fn(&T) -> String) {
    let _ = write!(out, "== {title} ==");
    if !snap.query.text.is_empty() {
        let _ = write!(out, "  search: \"{}\"", snap.query.text);
    }
    if snap.search_input != snap.query.text {
        let _ = write!(out, "  (typing \"{}\")", snap.search_input);
    }
    out.push('\n');

    match &snap.view {
        ListView::Idle => {}
        ListView::Loading => out.push_str("  loading...\n"),
        ListView::Empty => out.push_str("  no results\n"),
        ListView::Error(reason) => {
            let _ = writeln!(out, "  failed to load: {reason}");
        }
        ListView::Rows(rows) => {
            for item in rows {
                let _ = writeln!(out, "  {}", row(item));
            }
        }
    }

    let _ = writeln!(
        out,
        "  {} page {}/{} ({} total) {}",
        if snap.can_prev { "<" } else { " " },
        snap.query.page,
        snap.total_pages,
        snap.total_count,
        if snap.can_next { ">" } else { " " },
    );
}

fn detail<T>(out: &mut String, state: &DetailState<T>, render: fn(&mut String, &T)) {
    match state {
        DetailState::None => {}
        DetailState::Loading(id) => {
            let _ = writeln!(out, "-- #{id} loading... --");
        }
        DetailState::Failed(id, reason) => {
            let _ = writeln!(out, "-- #{id}: {reason} --");
        }
        DetailState::Loaded(item) => render(out, item),
    }
}

fn modal_banner(out: &mut String, kind: ModalKind) {
    if kind != ModalKind::None {
        let _ = writeln!(out, "-- {kind:?} --");
    }
}

fn notice(out: &mut String, message: Option<&str>) {
    if let Some(message) = message {
        let _ = writeln!(out, "* {message}");
    }
}

fn draft(out: &mut String, draft: Option<&CustomerDraft>) {
    let Some(d) = draft else { return };
    let _ = writeln!(out, "  first_name: {}", d.first_name);
    let _ = writeln!(out, "  last_name:  {}", d.last_name);
    let _ = writeln!(out, "  email:      {}", d.email);
    let _ = writeln!(
        out,
        "  store_id:   {}",
        d.store_id.map(|id| id.to_string()).unwrap_or_default()
    );
    let _ = writeln!(out, "  active:     {}", d.active);
}

fn film_row(f: &FilmSummary) -> String {
    match &f.category_name {
        Some(category) => format!("{:>5}  {}  [{category}]", f.film_id, f.title),
        None => format!("{:>5}  {}", f.film_id, f.title),
    }
}

fn actor_row(a: &ActorSummary) -> String {
    match a.film_count {
        Some(count) => format!("{:>5}  {}  ({count} films)", a.actor_id, a.full_name()),
        None => format!("{:>5}  {}", a.actor_id, a.full_name()),
    }
}

fn customer_row(c: &Customer) -> String {
    format!(
        "{:>5}  {}  <{}>{}",
        c.customer_id,
        c.full_name(),
        c.email.as_deref().unwrap_or("-"),
        if c.active { "" } else { "  inactive" }
    )
}

fn film_detail(out: &mut String, f: &FilmDetail) {
    let _ = writeln!(out, "-- #{} {} --", f.film_id, f.title);
    if let Some(description) = &f.description {
        let _ = writeln!(out, "  {description}");
    }
    let mut facts = Vec::new();
    if let Some(year) = f.release_year {
        facts.push(year.to_string());
    }
    if let Some(rating) = &f.rating {
        facts.push(rating.clone());
    }
    if let Some(length) = f.length {
        facts.push(format!("{length} min"));
    }
    if let Some(rate) = f.rental_rate {
        facts.push(format!("${rate:.2}"));
    }
    if let Some(days) = f.rental_duration {
        facts.push(format!("{days} days"));
    }
    if !facts.is_empty() {
        let _ = writeln!(out, "  {}", facts.join(" | "));
    }
    if let Some(features) = &f.special_features {
        let _ = writeln!(out, "  features: {features}");
    }
}

fn actor_detail(out: &mut String, a: &ActorDetail) {
    let _ = writeln!(out, "-- #{} {} --", a.actor.actor_id, a.actor.full_name());
    if a.top_films.is_empty() {
        out.push_str("  no rentals yet\n");
    }
    for film in &a.top_films {
        let _ = writeln!(out, "  {:>5}  {}", film.film_id, film.title);
    }
}

fn customer_detail(out: &mut String, d: &CustomerDetails) {
    let c = &d.customer;
    let _ = writeln!(
        out,
        "-- #{} {} <{}> --",
        c.customer_id,
        c.full_name(),
        c.email.as_deref().unwrap_or("-")
    );
    if d.rentals.is_empty() {
        out.push_str("  no rentals\n");
    }
    for rental in &d.rentals {
        let rented = rental
            .rental_date
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let returned = rental
            .return_date
            .map_or_else(|| "out".to_string(), |t| t.format("%Y-%m-%d").to_string());
        let _ = writeln!(
            out,
            "  {:>6}  {}  {rented} -> {returned}",
            rental.rental_id,
            rental.title.as_deref().unwrap_or("?"),
        );
    }
}
