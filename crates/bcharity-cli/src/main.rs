//! `bvms`: command-line client for the BCharity API.
//!
//! # Usage
//!
//! ```
//! bvms --url http://localhost:4783 causes
//! bvms --owner 0xabc --profile 0x02 donate 0x01-0x01 25
//! bvms --owner 0xabc publish-cause --name "Clean Water" --currency USDC --contribution 10
//! bvms --owner 0xdef log-hours 0x01-0x02 6 --date 2024-04-02
//! bvms --config ~/.config/bvms/config.toml opportunities --mine
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bcharity_core::{
  profile::ProfileId, publication::PublicationId, session::AppContext,
};
use bcharity_metadata::{
  ProfileDetails,
  record::{Application, Cause, Goal, Opportunity, VhrRequest},
};
use clap::{Parser, Subcommand};
use client::ApiClient;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "bvms", about = "Command-line client for the BCharity API")]
struct Args {
  /// Path to a TOML config file (url, owner, profile).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the bcharity server (default: http://localhost:4783).
  #[arg(long, env = "BVMS_URL")]
  url: Option<String>,

  /// Wallet address to sign in as.
  #[arg(long, env = "BVMS_OWNER")]
  owner: Option<String>,

  /// Profile to act as; defaults to the owner's first profile.
  #[arg(long, env = "BVMS_PROFILE")]
  profile: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List the signed-in owner's profiles.
  Profiles,
  /// Create a profile owned by the signed-in owner.
  CreateProfile {
    handle:   String,
    /// `organization` or `volunteer`.
    #[arg(long, default_value = "volunteer")]
    kind:     String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    website:  String,
  },
  /// Publish a cause as the current profile.
  PublishCause(CauseArgs),
  /// Publish a volunteer opportunity as the current profile.
  PublishOpportunity(OpportunityArgs),
  /// Apply to an opportunity as the current profile.
  Apply {
    opportunity: String,
    /// URL of your resume.
    #[arg(long, default_value = "")]
    resume:      String,
    #[arg(long, default_value = "")]
    description: String,
  },
  /// Publish a volunteer-hour goal as the current profile.
  Goal {
    hours: String,
    /// Target date, YYYY-MM-DD.
    #[arg(long, default_value = "")]
    by:    String,
  },
  /// Log volunteer hours against an opportunity.
  LogHours {
    opportunity: String,
    hours:       String,
    /// Day worked, YYYY-MM-DD.
    #[arg(long, default_value = "")]
    date:        String,
    #[arg(long, default_value = "")]
    description: String,
  },
  /// List hour requests logged against an opportunity.
  HourRequests { opportunity: String },
  /// Reject an hour request as the current profile.
  RejectHours { request: String },
  /// List causes.
  Causes {
    /// Only causes published by the current profile.
    #[arg(long)]
    mine: bool,
  },
  /// Show a cause and how much it has raised.
  Cause { id: String },
  /// Donate a custom amount to a cause as the current profile.
  Donate { cause: String, amount: String },
  /// List volunteer opportunities, latest end date first.
  Opportunities {
    #[arg(long)]
    mine: bool,
  },
  /// List applications to an opportunity with their status.
  Applications { opportunity: String },
  /// Accept an application as the current profile.
  Accept { application: String },
  /// Reject an application as the current profile.
  Reject { application: String },
  /// List volunteer-hour goals.
  Goals {
    #[arg(long)]
    mine: bool,
  },
  /// Hide one of your publications.
  Hide { id: String },
}

/// Fields of a new cause. `--id` defaults to a fresh UUID.
#[derive(clap::Args, Debug)]
struct CauseArgs {
  #[arg(long)]
  id:           Option<String>,
  #[arg(long)]
  name:         String,
  #[arg(long, default_value = "")]
  category:     String,
  #[arg(long, default_value = "WMATIC")]
  currency:     String,
  /// Amount per donation.
  #[arg(long, default_value = "")]
  contribution: String,
  /// Fundraising target.
  #[arg(long, default_value = "")]
  goal:         String,
  /// Wallet address receiving donations.
  #[arg(long, default_value = "")]
  recipient:    String,
  #[arg(long, default_value = "")]
  description:  String,
  #[arg(long, default_value = "")]
  location:     String,
  #[arg(long, default_value = "")]
  image_url:    String,
}

impl From<CauseArgs> for Cause {
  fn from(args: CauseArgs) -> Self {
    Self {
      id:           args.id.unwrap_or_else(new_record_id),
      name:         args.name,
      category:     args.category,
      currency:     args.currency,
      contribution: args.contribution,
      goal:         args.goal,
      recipient:    args.recipient,
      description:  args.description,
      location:     args.location,
      image_url:    args.image_url,
    }
  }
}

/// Fields of a new opportunity. `--id` defaults to a fresh UUID; an empty
/// `--end-date` means ongoing.
#[derive(clap::Args, Debug)]
struct OpportunityArgs {
  #[arg(long)]
  id:                   Option<String>,
  #[arg(long)]
  name:                 String,
  #[arg(long, default_value = "")]
  start_date:           String,
  #[arg(long, default_value = "")]
  end_date:             String,
  #[arg(long, default_value = "")]
  hours_per_week:       String,
  #[arg(long, default_value = "")]
  category:             String,
  #[arg(long, default_value = "")]
  website:              String,
  #[arg(long, default_value = "")]
  description:          String,
  #[arg(long, default_value = "")]
  image_url:            String,
  #[arg(long)]
  application_required: bool,
}

impl From<OpportunityArgs> for Opportunity {
  fn from(args: OpportunityArgs) -> Self {
    Self {
      id:                   args.id.unwrap_or_else(new_record_id),
      name:                 args.name,
      start_date:           args.start_date,
      end_date:             args.end_date,
      hours_per_week:       args.hours_per_week,
      category:             args.category,
      website:              args.website,
      description:          args.description,
      image_url:            args.image_url,
      application_required: args.application_required.to_string(),
    }
  }
}

fn new_record_id() -> String { uuid::Uuid::new_v4().to_string() }

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  owner:   String,
  #[serde(default)]
  profile: String,
}

/// Connection and identity settings after merging flags and the config file.
struct Settings {
  url:     String,
  owner:   Option<String>,
  profile: Option<String>,
}

fn non_empty(value: String) -> Option<String> { (!value.is_empty()).then_some(value) }

impl Settings {
  /// CLI flags override the config file, which overrides defaults.
  fn merge(args: &Args, file: ConfigFile) -> Self {
    Self {
      url:     args
        .url
        .clone()
        .or_else(|| non_empty(file.url))
        .unwrap_or_else(|| "http://localhost:4783".to_owned()),
      owner:   args.owner.clone().or_else(|| non_empty(file.owner)),
      profile: args.profile.clone().or_else(|| non_empty(file.profile)),
    }
  }
}

// ─── Session ──────────────────────────────────────────────────────────────────

async fn sign_in(client: &ApiClient, settings: &Settings) -> Result<AppContext> {
  let owner = settings
    .owner
    .as_deref()
    .context("no owner address; pass --owner or set BVMS_OWNER")?;
  let profiles = client.profiles_owned_by(owner).await?;
  tracing::debug!(owner, profiles = profiles.len(), "signed in");

  let mut ctx = AppContext::new();
  ctx.sign_in(owner, profiles);
  if let Some(id) = &settings.profile {
    ctx.select_profile(&ProfileId::new(id.as_str()))?;
  }
  Ok(ctx)
}

async fn current_profile(client: &ApiClient, settings: &Settings) -> Result<ProfileId> {
  let ctx = sign_in(client, settings).await?;
  Ok(ctx.require_profile()?.id.clone())
}

async fn filter_for(client: &ApiClient, settings: &Settings, mine: bool) -> Result<Option<ProfileId>> {
  if mine {
    Ok(Some(current_profile(client, settings).await?))
  } else {
    Ok(None)
  }
}

async fn review(client: &ApiClient, settings: &Settings, application: &str, accept: bool) -> Result<()> {
  let from = current_profile(client, settings).await?;
  client
    .review(&PublicationId::new(application), &from, accept)
    .await?;
  println!("{} {application}", if accept { "accepted" } else { "rejected" });
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };
  let settings = Settings::merge(&args, file_cfg);
  let client = ApiClient::new(settings.url.clone())?;

  match args.command {
    Command::Profiles => {
      let ctx = sign_in(&client, &settings).await?;
      let selected = ctx.current_profile().map(|p| p.id.clone());
      for profile in ctx.profiles() {
        println!("{}", render::profile_line(profile, Some(&profile.id) == selected.as_ref()));
      }
    }
    Command::CreateProfile {
      handle,
      kind,
      location,
      website,
    } => {
      let owner = settings
        .owner
        .as_deref()
        .context("no owner address; pass --owner or set BVMS_OWNER")?;
      let details = ProfileDetails {
        profile_type: kind,
        location,
        website,
      };
      let profile = client.create_profile(&handle, owner, &details).await?;
      println!("created @{} ({})", profile.handle, profile.id);
    }
    Command::PublishCause(cause) => {
      let from = current_profile(&client, &settings).await?;
      let cause = client.publish_cause(&from, &Cause::from(cause)).await?;
      println!("{}", render::cause_line(&cause));
    }
    Command::PublishOpportunity(opportunity) => {
      let from = current_profile(&client, &settings).await?;
      let opportunity = client
        .publish_opportunity(&from, &Opportunity::from(opportunity))
        .await?;
      println!("{}", render::opportunity_line(&opportunity));
    }
    Command::Apply {
      opportunity,
      resume,
      description,
    } => {
      let from = current_profile(&client, &settings).await?;
      let application = Application {
        resume,
        description,
        manual: "false".to_owned(),
        ..Application::default()
      };
      let applied = client
        .apply(&PublicationId::new(opportunity.as_str()), &from, &application)
        .await?;
      println!("applied to {opportunity} ({})", applied.post_id);
    }
    Command::Goal { hours, by } => {
      let from = current_profile(&client, &settings).await?;
      let goal = Goal {
        goal:      hours,
        goal_date: by,
      };
      let goal = client.publish_goal(&from, &goal).await?;
      println!("{}", render::goal_line(&goal));
    }
    Command::LogHours {
      opportunity,
      hours,
      date,
      description,
    } => {
      let from = current_profile(&client, &settings).await?;
      let request = VhrRequest {
        hours,
        date,
        description,
      };
      let logged = client
        .log_hours(&PublicationId::new(opportunity), &from, &request)
        .await?;
      println!("logged {} hours ({})", logged.record.hours, logged.post_id);
    }
    Command::HourRequests { opportunity } => {
      for entry in client.vhr_requests(&PublicationId::new(opportunity)).await? {
        println!("{}", render::vhr_request_line(&entry));
      }
    }
    Command::RejectHours { request } => {
      let from = current_profile(&client, &settings).await?;
      client
        .reject_hours(&PublicationId::new(request.as_str()), &from)
        .await?;
      println!("rejected {request}");
    }
    Command::Causes { mine } => {
      let by = filter_for(&client, &settings, mine).await?;
      for cause in client.causes(by.as_ref()).await? {
        println!("{}", render::cause_line(&cause));
      }
    }
    Command::Cause { id } => {
      let summary = client.cause(&PublicationId::new(id)).await?;
      print!("{}", render::cause_summary(&summary));
    }
    Command::Donate { cause, amount } => {
      let from = current_profile(&client, &settings).await?;
      let donation = client
        .donate(&PublicationId::new(cause), &from, &amount)
        .await?;
      println!("donated {amount} ({})", donation.id);
    }
    Command::Opportunities { mine } => {
      let by = filter_for(&client, &settings, mine).await?;
      for opportunity in client.opportunities(by.as_ref()).await? {
        println!("{}", render::opportunity_line(&opportunity));
      }
    }
    Command::Applications { opportunity } => {
      for entry in client.applications(&PublicationId::new(opportunity)).await? {
        println!("{}", render::application_line(&entry));
      }
    }
    Command::Accept { application } => review(&client, &settings, &application, true).await?,
    Command::Reject { application } => review(&client, &settings, &application, false).await?,
    Command::Goals { mine } => {
      let by = filter_for(&client, &settings, mine).await?;
      for goal in client.goals(by.as_ref()).await? {
        println!("{}", render::goal_line(&goal));
      }
    }
    Command::Hide { id } => {
      let from = current_profile(&client, &settings).await?;
      client.hide(&PublicationId::new(id.as_str()), &from).await?;
      println!("hid {id}");
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_override_config_file() {
    let args = Args::parse_from(["bvms", "--owner", "0xflag", "causes"]);
    let file = ConfigFile {
      url:     "http://example.test".into(),
      owner:   "0xfile".into(),
      profile: String::new(),
    };
    let settings = Settings::merge(&args, file);
    assert_eq!(settings.url, "http://example.test");
    assert_eq!(settings.owner.as_deref(), Some("0xflag"));
    assert_eq!(settings.profile, None);
  }

  #[test]
  fn publish_cause_flags_fill_the_record() {
    let args = Args::parse_from([
      "bvms",
      "publish-cause",
      "--name",
      "Clean Water",
      "--currency",
      "USDC",
      "--contribution",
      "10",
      "--image-url",
      "ipfs://img",
    ]);
    let Command::PublishCause(cause) = args.command else {
      panic!("expected publish-cause");
    };
    let cause = Cause::from(cause);
    assert_eq!(cause.name, "Clean Water");
    assert_eq!(cause.currency, "USDC");
    assert_eq!(cause.image_url, "ipfs://img");
    assert!(uuid::Uuid::parse_str(&cause.id).is_ok());
  }

  #[test]
  fn opportunity_flag_becomes_boolean_string() {
    let args = Args::parse_from([
      "bvms",
      "publish-opportunity",
      "--id",
      "o-1",
      "--name",
      "Tutoring",
      "--end-date",
      "2025-01-31",
      "--application-required",
    ]);
    let Command::PublishOpportunity(opportunity) = args.command else {
      panic!("expected publish-opportunity");
    };
    let opportunity = Opportunity::from(opportunity);
    assert_eq!(opportunity.id, "o-1");
    assert_eq!(opportunity.end_date, "2025-01-31");
    assert!(opportunity.application_required());
  }
}
