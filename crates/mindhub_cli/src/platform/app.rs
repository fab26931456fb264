use std::sync::Arc;

use anyhow::{bail, Context, Result};
use mindhub_client::{endpoints, export_json, EngineHandle, ReqwestTransport, Reviewable};
use mindhub_core::{
    parse_tag_string, parse_tags, sort_servers_named_first, update_list, update_queue, CustomTag,
    ListConfig, ListEffect, ListMsg, LoaderState, MindustryServer, NoticeLevel, PagedList, Post,
    QueueEffect, QueueMsg, SchematicUpload, SessionContext, Submission, TagCatalog, User,
    VerifyQueue,
};
use mindhub_logging::{hub_info, hub_warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::config::{page_size_or_default, ClientConfig};
use super::effects::EffectRunner;
use super::render::{self, Describe};
use crate::cli::{Command, ListArgs, QueueArgs, ServersArgs, SubmissionKind, VerifyArgs};

/// One front-end session: configuration, the effect runner and the
/// signed-in user.
pub struct App {
    config: ClientConfig,
    runner: EffectRunner,
    session: SessionContext,
}

impl App {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.settings())?;
        let engine =
            EngineHandle::new(Arc::new(transport)).context("failed to start request engine")?;
        Ok(Self {
            runner: EffectRunner::new(engine, config.wait()),
            config,
            session: SessionContext::new(),
        })
    }

    pub fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::List(args) => self.list(args),
            Command::Servers(args) => self.servers(args),
            Command::Queue(args) => match args.kind {
                SubmissionKind::Schematic => self.queue::<SchematicUpload>(&args),
                SubmissionKind::Post => self.queue::<Post>(&args),
            },
            Command::Verify(args) => match args.kind {
                SubmissionKind::Schematic => self.verify::<SchematicUpload>(args),
                SubmissionKind::Post => self.verify::<Post>(args),
            },
            Command::Tags { kind } => {
                for category in self.catalog(kind)?.categories() {
                    println!("{}", render::category_line(category));
                }
                Ok(())
            }
            Command::Me => {
                let user = self.sign_in()?;
                println!("{}", render::user_line(&user));
                Ok(())
            }
            Command::Ping => {
                let response = self.runner.call(endpoints::ping())?;
                println!("{}", String::from_utf8_lossy(&response.body).trim());
                Ok(())
            }
        }
    }

    /// Prints queued notices to stderr; true if any was an error.
    pub fn flush_notices(&mut self) -> bool {
        let mut failed = false;
        for notice in self.session.drain_notices() {
            failed |= notice.level == NoticeLevel::Error;
            eprintln!("{}", render::notice_line(&notice));
        }
        failed
    }

    fn list(&mut self, args: ListArgs) -> Result<()> {
        let page_size = match args.page_size {
            Some(size) => page_size_or_default(size, "--page-size"),
            None => self.config.page_size(),
        };
        let mut config =
            ListConfig::new(args.resource.as_str(), page_size).with_policy(self.config.policy());
        for (key, value) in args.query {
            config = config.with_query(key, value);
        }
        if !args.tags.is_empty() {
            config = config.with_query("tags", args.tags.join(","));
        }

        let (list, effects) = PagedList::<Value>::open(config);
        let list = self.load_pages(list, effects, args.pages)?;

        for item in list.items() {
            println!("{item}");
        }
        println!("{}", render::footer_line(&list.view()));

        if let Some(path) = args.out {
            let written = export_json(&path, &list.pages().to_vec())?;
            hub_info!("Exported {} items to {:?}", list.len(), written);
            println!("wrote {} items to {}", list.len(), written.display());
        }
        Ok(())
    }

    fn servers(&mut self, args: ServersArgs) -> Result<()> {
        if let Some(address) = &args.add {
            self.runner
                .call(endpoints::add_server(address))
                .with_context(|| format!("failed to add server {address}"))?;
            println!("added {address}");
        }

        let config = ListConfig::new(endpoints::MINDUSTRY_SERVERS, self.config.server_page_size())
            .with_policy(self.config.policy());
        let (list, effects) = PagedList::<MindustryServer>::open(config);
        let mut list = self.load_pages(list, effects, args.pages)?;

        if let Some(address) = &args.remove {
            self.runner
                .call(endpoints::remove_server(address))
                .with_context(|| format!("failed to remove server {address}"))?;
            let removed = list.retain(|server| server.address != *address);
            println!("removed {address} ({removed} listed)");
        }

        let mut servers = list.pages().to_vec();
        sort_servers_named_first(&mut servers);
        for server in &servers {
            println!("{}", render::server_line(server));
        }
        println!("{}", render::footer_line(&list.view()));
        Ok(())
    }

    fn queue<T>(&mut self, args: &QueueArgs) -> Result<()>
    where
        T: Reviewable + Describe + Clone + DeserializeOwned,
    {
        self.require_admin()?;
        let queue = self.open_queue::<T>(args.kind, args.pages, None)?;

        for item in queue.list().items() {
            println!("{}", item.headline());
            for line in render::tag_lines(&parse_tags(item.raw_tags(), queue.catalog())) {
                println!("{line}");
            }
        }
        println!("{}", render::queue_summary(&queue.view()));
        Ok(())
    }

    fn verify<T>(&mut self, args: VerifyArgs) -> Result<()>
    where
        T: Reviewable + Clone + DeserializeOwned,
    {
        self.require_admin()?;
        let queue = self.open_queue::<T>(args.kind, args.pages, Some(&args.id))?;

        let mut queue = self.step(queue, QueueMsg::Open { id: args.id.clone() })?;
        if queue.panel().is_none() {
            bail!("submission {} is not in the first {} pages", args.id, args.pages);
        }

        for raw in &args.tags {
            let parsed = parse_tag_string(raw, queue.catalog());
            for tag in parsed.tags {
                queue = self.step(queue, QueueMsg::AddTag(tag))?;
            }
        }

        let decision = match args.reject {
            Some(reason) => QueueMsg::Reject { reason },
            None => QueueMsg::Verify,
        };
        // Waits for the decision to settle as well.
        let queue = self.step(queue, decision)?;
        if queue.panel().is_some() {
            bail!("nothing submitted for {}", args.id);
        }

        if self.flush_notices() {
            bail!("review of {} failed", args.id);
        }
        println!("{}", render::queue_summary(&queue.view()));
        Ok(())
    }

    fn sign_in(&mut self) -> Result<User> {
        self.session.begin_login();
        match self.runner.call_json::<User>(endpoints::me()) {
            Ok(user) => {
                self.session.login(user.clone());
                Ok(user)
            }
            Err(err) => {
                self.session.login_failed(err.to_string());
                Err(err.context("could not load the signed-in user"))
            }
        }
    }

    fn require_admin(&mut self) -> Result<()> {
        let user = self.sign_in()?;
        if !self.session.is_admin() {
            bail!("{} is not an admin", user.name);
        }
        Ok(())
    }

    fn catalog(&mut self, kind: SubmissionKind) -> Result<TagCatalog> {
        let categories: Vec<CustomTag> = self
            .runner
            .call_json(endpoints::tags(kind.tag_kind()))
            .context("failed to load tag categories")?;
        Ok(TagCatalog::from_categories(categories))
    }

    /// Opens the review queue for `kind` and loads up to `max_pages` pages,
    /// stopping early once `wanted` is loaded.
    fn open_queue<T>(
        &mut self,
        kind: SubmissionKind,
        max_pages: usize,
        wanted: Option<&str>,
    ) -> Result<VerifyQueue<T>>
    where
        T: Reviewable + Clone + DeserializeOwned,
    {
        let catalog = self.catalog(kind)?;
        let config = ListConfig::new(kind.resource(), self.config.page_size())
            .with_policy(self.config.policy());
        let (queue, effects) = VerifyQueue::open(config, catalog);
        let mut queue = self.settle(queue, effects, max_pages, wanted)?;

        match self.runner.call_json::<u64>(endpoints::total(kind.resource())) {
            Ok(total) => {
                let (next, effects) = update_queue(queue, QueueMsg::TotalLoaded(total));
                self.runner.run_queue(effects, &mut self.session);
                queue = next;
            }
            Err(err) => hub_warn!("Pending total unavailable: {:#}", err),
        }
        Ok(queue)
    }

    fn step<T>(&mut self, queue: VerifyQueue<T>, msg: QueueMsg<T>) -> Result<VerifyQueue<T>>
    where
        T: Reviewable + Clone + DeserializeOwned,
    {
        let (queue, effects) = update_queue(queue, msg);
        self.settle(queue, effects, 0, None)
    }

    /// Runs `effects` and feeds answers back until nothing is in flight.
    /// Loads further pages while the list has more and fewer than
    /// `max_pages` are stored.
    fn settle<T>(
        &mut self,
        mut queue: VerifyQueue<T>,
        effects: Vec<QueueEffect<T>>,
        max_pages: usize,
        wanted: Option<&str>,
    ) -> Result<VerifyQueue<T>>
    where
        T: Reviewable + Clone + DeserializeOwned,
    {
        self.runner.run_queue(effects, &mut self.session);
        loop {
            let msg = if self.runner.has_pending() {
                self.runner.next_queue_msg()?
            } else if wants_more(queue.list(), max_pages)
                && !wanted.is_some_and(|id| queue.list().items().any(|item| item.id() == id))
            {
                QueueMsg::List(ListMsg::LoadNextPage)
            } else {
                return Ok(queue);
            };
            let (next, effects) = update_queue(queue, msg);
            queue = next;
            self.runner.run_queue(effects, &mut self.session);
        }
    }

    fn load_pages<T: DeserializeOwned>(
        &mut self,
        mut list: PagedList<T>,
        effects: Vec<ListEffect>,
        max_pages: usize,
    ) -> Result<PagedList<T>> {
        self.runner.run_list(effects);
        loop {
            let msg = if self.runner.has_pending() {
                self.runner.next_list_msg()?
            } else if wants_more(&list, max_pages) {
                ListMsg::LoadNextPage
            } else {
                return Ok(list);
            };
            let (next, effects) = update_list(list, msg);
            list = next;
            self.runner.run_list(effects);
        }
    }
}

/// A failed fetch stops automatic paging even when the list would allow a
/// retry; the user reruns the command instead.
fn wants_more<T>(list: &PagedList<T>, max_pages: usize) -> bool {
    list.state() == LoaderState::More
        && list.last_failure().is_none()
        && list.pages().page_count() < max_pages
}
