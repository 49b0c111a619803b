use std::sync::Arc;

use chrono::Utc;
use engine::{
    Budget, BudgetSpendingsStore, DelSpending, FileBackend, Money, Spending, StoreError, Version,
    new_spending_id,
};
use remote::{ApiClient, Remote};
use tracing::{info, warn};

use crate::{
    error::{AppError, Result},
    settings::{AddArgs, Command, EditArgs, Settings},
};

pub struct App {
    settings: Settings,
    remote: Remote,
}

impl App {
    /// Open the file-backed store under `data_dir` and wire the sync parts.
    pub fn open(settings: Settings) -> Result<Self> {
        let store = BudgetSpendingsStore::builder()
            .backend(Arc::new(FileBackend::new(&settings.data_dir)))
            .read_lag(settings.read_lag())
            .build()?;
        let client = ApiClient::new(&settings.server_url, settings.request_timeout())?;
        let remote = Remote::new(Arc::new(store), client);
        Ok(Self { settings, remote })
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Budgets => self.budgets(),
            Command::List { budgets } => self.list(&budgets),
            Command::Add(args) => self.add(args).await,
            Command::Edit(args) => self.edit(args).await,
            Command::Delete { budget, id } => self.delete(budget, &id).await,
            Command::Fetch => self.fetch().await,
            Command::Push => self.push().await,
            Command::Conflicts { clear, dismiss } => self.conflicts(clear, dismiss),
            Command::Sync => self.sync().await,
        }
    }

    fn budgets(&self) -> Result<()> {
        for budget in self.remote.facade.budgets()? {
            println!(
                "{:>4}  {:<12} {}  {} .. {}  {}",
                budget.id, budget.alias, budget.name, budget.date_from, budget.date_to, budget.money
            );
        }
        Ok(())
    }

    fn list(&self, budget_ids: &[i64]) -> Result<()> {
        let ids: Vec<i64> = if budget_ids.is_empty() {
            self.remote.facade.budgets()?.iter().map(|b| b.id).collect()
        } else {
            budget_ids.to_vec()
        };
        for spending in self.remote.facade.spendings_by_budget_ids(&ids)? {
            println!(
                "{}  {}  {:>12}  {}  [{}]",
                spending.id, spending.date, spending.money, spending.description, spending.version
            );
        }
        Ok(())
    }

    async fn add(&self, args: AddArgs) -> Result<()> {
        let budget = self.budget(args.budget)?;
        let now = Utc::now();
        let spending = Spending {
            id: new_spending_id(),
            version: Version::generate(None),
            parent_version: None,
            date: args.date.unwrap_or_else(|| now.date_naive()),
            sort: now.timestamp(),
            money: parse_amount(&args.amount, &budget)?,
            description: args.description,
            created_at: now,
            updated_at: now,
        };

        self.remote.facade.create_spending(budget.id, &spending)?;
        println!("created {} [{}]", spending.id, spending.version);
        self.upload_now().await;
        Ok(())
    }

    async fn edit(&self, args: EditArgs) -> Result<()> {
        let budget = self.budget(args.budget)?;
        let current = self.spending(budget.id, &args.id)?;

        let money = match args.amount.as_deref() {
            Some(raw) => parse_amount(raw, &budget)?,
            None => current.money.clone(),
        };
        let updated = Spending {
            version: Version::generate(Some(&current.version)),
            parent_version: Some(current.version.clone()),
            date: args.date.unwrap_or(current.date),
            money,
            description: args.description.unwrap_or_else(|| current.description.clone()),
            updated_at: Utc::now(),
            ..current
        };

        self.remote.facade.update_spending(budget.id, &updated)?;
        println!("updated {} [{}]", updated.id, updated.version);
        self.upload_now().await;
        Ok(())
    }

    async fn delete(&self, budget_id: i64, id: &str) -> Result<()> {
        let current = self.spending(budget_id, id)?;
        let del = DelSpending {
            id: current.id,
            version: Version::generate(Some(&current.version)),
            parent_version: current.version,
            updated_at: Utc::now(),
        };

        self.remote.facade.delete_spending(budget_id, &del)?;
        println!("deleted {} [{}]", del.id, del.version);
        self.upload_now().await;
        Ok(())
    }

    async fn fetch(&self) -> Result<()> {
        let conflicts = self.remote.fetcher.fetch_and_store().await?;
        println!(
            "fetched {} budgets, {} new conflicts",
            self.remote.facade.budgets()?.len(),
            conflicts.len()
        );
        Ok(())
    }

    async fn push(&self) -> Result<()> {
        let outcome = self.remote.uploader.flush().await?;
        println!(
            "applied {}, rejected {}, still queued {}",
            outcome.success.len(),
            outcome.conflict.len(),
            self.remote.queue.len()?
        );
        Ok(())
    }

    fn conflicts(&self, clear: bool, dismiss: Option<String>) -> Result<()> {
        if clear {
            self.remote.conflicts.clear()?;
            println!("conflicts cleared");
            return Ok(());
        }
        if let Some(version) = dismiss {
            let left = self.remote.conflicts.remove(&Version::from(version.as_str()))?;
            println!("{left} conflict(s) left");
            return Ok(());
        }
        for conflict in self.remote.conflicts.list()? {
            println!(
                "{}  budget {}  {} [{}]: {} -> {}  ({})",
                conflict.conflicted_at.format("%Y-%m-%d %H:%M"),
                conflict.budget_id,
                conflict.spending_id,
                conflict.version,
                conflict.from.as_deref().unwrap_or("-"),
                conflict.to.as_deref().unwrap_or("deleted"),
                conflict.reason.as_deref().unwrap_or("no reason")
            );
        }
        Ok(())
    }

    async fn sync(&self) -> Result<()> {
        let syncer = self.remote.syncer();
        info!(server = %self.settings.server_url, "sync started");
        tokio::select! {
            result = syncer.run(self.settings.fetch_interval(), self.settings.upload_retry()) => {
                result?;
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("sync interrupted");
            }
        }
        Ok(())
    }

    /// Edits are stored already; a failed upload stays queued for `push` or
    /// `sync`.
    async fn upload_now(&self) {
        match self.remote.uploader.flush().await {
            Ok(outcome) if !outcome.conflict.is_empty() => {
                println!("server rejected {} change(s), see `conflicts`", outcome.conflict.len());
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "upload postponed");
                println!("upload postponed: {err}");
            }
        }
    }

    fn budget(&self, budget_id: i64) -> Result<Budget> {
        self.remote
            .facade
            .budgets()?
            .into_iter()
            .find(|b| b.id == budget_id)
            .ok_or(AppError::Store(StoreError::UnknownBudget(budget_id)))
    }

    fn spending(&self, budget_id: i64, id: &str) -> Result<Spending> {
        self.remote
            .facade
            .spendings_by_budget_id(budget_id)?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::Store(StoreError::NotFound(id.to_string())))
    }
}

fn parse_amount(raw: &str, budget: &Budget) -> Result<Money> {
    Ok(Money::parse(
        raw,
        budget.money.fraction(),
        budget.money.currency(),
    )?)
}
