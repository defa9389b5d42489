//! 主循环：读取命令 → 更新页面 → 打印快照

use anyhow::Context;
use rental_catalog_core::{
    ActionResult, ActorsPage, CustomersPage, FilmsPage, PageContext, PageNav,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::message::{self, Command, HELP, PageKind};
use crate::view;

/// The page currently on screen. Replacing it drops the old page, which
/// tears down its timers and in-flight fetches.
pub enum ActivePage {
    Films(FilmsPage),
    Customers(CustomersPage),
    Actors(ActorsPage),
}

impl ActivePage {
    fn kind(&self) -> PageKind {
        match self {
            Self::Films(_) => PageKind::Films,
            Self::Customers(_) => PageKind::Customers,
            Self::Actors(_) => PageKind::Actors,
        }
    }
}

/// Runs `$body` with `$list` bound to the active page's list controller.
macro_rules! with_list {
    ($page:expr, $list:ident => $body:expr) => {
        match $page {
            ActivePage::Films(p) => {
                let $list = p.list();
                $body
            }
            ActivePage::Customers(p) => {
                let $list = p.list();
                $body
            }
            ActivePage::Actors(p) => {
                let $list = p.list();
                $body
            }
        }
    };
}

pub struct App {
    ctx: PageContext,
    page: ActivePage,
    running: bool,
}

impl App {
    /// Start on the films page with its first page loaded.
    pub async fn new(ctx: PageContext) -> Self {
        let page = ActivePage::Films(FilmsPage::new(&ctx));
        let app = Self {
            ctx,
            page,
            running: true,
        };
        app.reload().await;
        app
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn view(&self) -> String {
        match &self.page {
            ActivePage::Films(p) => view::films(&p.snapshot()),
            ActivePage::Customers(p) => view::customers(&p.snapshot()),
            ActivePage::Actors(p) => view::actors(&p.snapshot()),
        }
    }

    /// Apply one command. Returns a line of feedback the snapshot does not already show.
    pub async fn update(&mut self, command: Command) -> Option<String> {
        match command {
            Command::Open(kind) => {
                self.open(kind).await;
                None
            }
            Command::Search(text) => {
                with_list!(&self.page, list => list.apply_search(text).await);
                None
            }
            Command::Navigate(nav) => {
                let moved = with_list!(&self.page, list => list.go_to(nav).await);
                (!moved).then(|| match nav {
                    PageNav::Prev | PageNav::First => "already on the first page".to_string(),
                    PageNav::Next | PageNav::Last => "already on the last page".to_string(),
                    PageNav::To(_) => "already on that page".to_string(),
                })
            }
            Command::Reload => {
                self.reload().await;
                None
            }
            Command::Show(id) => {
                match &mut self.page {
                    ActivePage::Films(p) => p.show(id).await,
                    ActivePage::Customers(p) => p.show(id).await,
                    ActivePage::Actors(p) => p.show(id).await,
                }
                None
            }
            Command::Close => {
                match &mut self.page {
                    ActivePage::Films(p) => p.close(),
                    ActivePage::Customers(p) => p.close(),
                    ActivePage::Actors(p) => p.close(),
                }
                None
            }
            Command::Rent(customer_id) => {
                let ActivePage::Films(p) = &mut self.page else {
                    return Some(only_on("rent", PageKind::Films));
                };
                p.set_customer_id(&customer_id);
                // Failures are shown in the rent form.
                p.rent().await;
                None
            }
            Command::New => self.customers("new", |p| {
                p.begin_create();
                None
            }),
            Command::Delete(id) => self.customers("delete", |p| {
                p.begin_delete(id);
                None
            }),
            Command::Set { field, value } => self.customers("set", |p| {
                p.set_field(&field, &value).err().map(|e| e.to_string())
            }),
            Command::Edit(id) => {
                let ActivePage::Customers(p) = &mut self.page else {
                    return Some(only_on("edit", PageKind::Customers));
                };
                p.begin_edit(id).await.err().map(|e| e.to_string())
            }
            Command::Confirm => {
                let ActivePage::Customers(p) = &mut self.page else {
                    return Some(only_on("confirm", PageKind::Customers));
                };
                match p.confirm().await {
                    ActionResult::Ok => None,
                    // Errors inside an open modal are already on screen.
                    ActionResult::Rejected { message, .. } => {
                        p.snapshot().error.is_none().then_some(message)
                    }
                }
            }
            Command::Help => Some(HELP.to_string()),
            Command::Quit => {
                self.running = false;
                None
            }
        }
    }

    async fn open(&mut self, kind: PageKind) {
        if self.page.kind() == kind {
            return;
        }
        tracing::debug!("switching to {kind:?}");
        self.page = match kind {
            PageKind::Films => ActivePage::Films(FilmsPage::new(&self.ctx)),
            PageKind::Customers => ActivePage::Customers(CustomersPage::new(&self.ctx)),
            PageKind::Actors => ActivePage::Actors(ActorsPage::new(&self.ctx)),
        };
        self.reload().await;
    }

    async fn reload(&self) {
        with_list!(&self.page, list => list.reload().await);
    }

    fn customers(
        &mut self,
        command: &'static str,
        f: impl FnOnce(&mut CustomersPage) -> Option<String>,
    ) -> Option<String> {
        match &mut self.page {
            ActivePage::Customers(p) => f(p),
            _ => Some(only_on(command, PageKind::Customers)),
        }
    }
}

fn only_on(command: &str, kind: PageKind) -> String {
    let page = match kind {
        PageKind::Films => "films",
        PageKind::Customers => "customers",
        PageKind::Actors => "actors",
    };
    format!("`{command}` is only available on the {page} page")
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run(mut app: App) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", app.view());

    while app.is_running() {
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        match message::parse(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                if let Some(feedback) = app.update(command).await {
                    println!("{feedback}");
                }
            }
            Err(e) => {
                println!("{e}");
                continue;
            }
        }
        if app.is_running() {
            println!("{}", app.view());
        }
    }

    tracing::info!("bye");
    Ok(())
}
