//! Async HTTP client wrapping the BCharity JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use bcharity_core::{
  profile::{Profile, ProfileId},
  publication::{Publication, PublicationId},
  status::{ApplicationStatus, VhrRequestStatus},
};
use bcharity_metadata::{
  ApplicationRecord, CauseRecord, GoalRecord, OpportunityRecord, ProfileDetails,
  VhrRequestRecord,
  record::{Application, Cause, Goal, Opportunity, VhrRequest},
};
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

/// `GET /causes/{id}` as seen by the client.
#[derive(Debug, Deserialize)]
pub struct CauseSummary {
  pub cause:            CauseRecord,
  pub total_donated:    Decimal,
  pub currency_symbol:  String,
  pub progress_percent: Option<Decimal>,
}

/// One entry of `GET /opportunities/{id}/applications`.
#[derive(Debug, Deserialize)]
pub struct ApplicationEntry {
  #[serde(flatten)]
  pub application: ApplicationRecord,
  pub status:      ApplicationStatus,
}

/// One entry of `GET /opportunities/{id}/vhr-requests`.
#[derive(Debug, Deserialize)]
pub struct VhrRequestEntry {
  #[serde(flatten)]
  pub request: VhrRequestRecord,
  pub status:  VhrRequestStatus,
}

/// Async HTTP client for the BCharity JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      base_url: base_url.into(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let resp = check(resp, what).await?;
    resp.json().await.with_context(|| format!("deserialising {what}"))
  }

  async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
    let req = self.client.get(self.url(path)).query(query);
    self.send(req, &format!("GET {path}")).await
  }

  async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
    let req = self.client.post(self.url(path)).json(&body);
    self.send(req, &format!("POST {path}")).await
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  /// `GET /api/profiles?owned_by=<address>`
  pub async fn profiles_owned_by(&self, owner: &str) -> Result<Vec<Profile>> {
    self.get("/profiles", &[("owned_by", owner)]).await
  }

  /// `POST /api/profiles`
  pub async fn create_profile(
    &self,
    handle: &str,
    owner: &str,
    details: &ProfileDetails,
  ) -> Result<Profile> {
    self
      .post(
        "/profiles",
        json!({ "handle": handle, "owned_by": owner, "profile": details }),
      )
      .await
  }

  // ── Causes ────────────────────────────────────────────────────────────────

  /// `GET /api/causes[?profile_id=<id>]`
  pub async fn causes(&self, by: Option<&ProfileId>) -> Result<Vec<CauseRecord>> {
    self.get("/causes", &profile_filter(by)).await
  }

  /// `POST /api/causes`
  pub async fn publish_cause(&self, from: &ProfileId, cause: &Cause) -> Result<CauseRecord> {
    self
      .post("/causes", json!({ "from": from, "cause": cause }))
      .await
  }

  /// `GET /api/causes/{id}`
  pub async fn cause(&self, id: &PublicationId) -> Result<CauseSummary> {
    self.get(&format!("/causes/{id}"), &[]).await
  }

  /// `POST /api/causes/{id}/donations`
  pub async fn donate(
    &self,
    id: &PublicationId,
    from: &ProfileId,
    amount: &str,
  ) -> Result<Publication> {
    self
      .post(
        &format!("/causes/{id}/donations"),
        json!({ "from": from, "amount": amount }),
      )
      .await
  }

  // ── Opportunities ─────────────────────────────────────────────────────────

  /// `GET /api/opportunities?sort=end_date[&profile_id=<id>]`
  pub async fn opportunities(&self, by: Option<&ProfileId>) -> Result<Vec<OpportunityRecord>> {
    let mut query = profile_filter(by);
    query.push(("sort", "end_date"));
    self.get("/opportunities", &query).await
  }

  /// `POST /api/opportunities`
  pub async fn publish_opportunity(
    &self,
    from: &ProfileId,
    opportunity: &Opportunity,
  ) -> Result<OpportunityRecord> {
    self
      .post(
        "/opportunities",
        json!({ "from": from, "opportunity": opportunity }),
      )
      .await
  }

  /// `GET /api/opportunities/{id}/applications`
  pub async fn applications(&self, opportunity: &PublicationId) -> Result<Vec<ApplicationEntry>> {
    self
      .get(&format!("/opportunities/{opportunity}/applications"), &[])
      .await
  }

  /// `POST /api/opportunities/{id}/applications`
  pub async fn apply(
    &self,
    opportunity: &PublicationId,
    from: &ProfileId,
    application: &Application,
  ) -> Result<ApplicationRecord> {
    self
      .post(
        &format!("/opportunities/{opportunity}/applications"),
        json!({ "from": from, "application": application }),
      )
      .await
  }

  /// `POST /api/applications/{id}/{accept,reject}`
  pub async fn review(
    &self,
    application: &PublicationId,
    from: &ProfileId,
    accept: bool,
  ) -> Result<Value> {
    let verb = if accept { "accept" } else { "reject" };
    self
      .post(
        &format!("/applications/{application}/{verb}"),
        json!({ "from": from }),
      )
      .await
  }

  // ── Volunteer hours ───────────────────────────────────────────────────────

  /// `GET /api/opportunities/{id}/vhr-requests`
  pub async fn vhr_requests(&self, opportunity: &PublicationId) -> Result<Vec<VhrRequestEntry>> {
    self
      .get(&format!("/opportunities/{opportunity}/vhr-requests"), &[])
      .await
  }

  /// `POST /api/opportunities/{id}/vhr-requests`
  pub async fn log_hours(
    &self,
    opportunity: &PublicationId,
    from: &ProfileId,
    request: &VhrRequest,
  ) -> Result<VhrRequestRecord> {
    self
      .post(
        &format!("/opportunities/{opportunity}/vhr-requests"),
        json!({ "from": from, "request": request }),
      )
      .await
  }

  /// `POST /api/vhr-requests/{id}/reject`
  pub async fn reject_hours(&self, request: &PublicationId, from: &ProfileId) -> Result<Value> {
    self
      .post(&format!("/vhr-requests/{request}/reject"), json!({ "from": from }))
      .await
  }

  // ── Goals ─────────────────────────────────────────────────────────────────

  /// `GET /api/goals[?profile_id=<id>]`
  pub async fn goals(&self, by: Option<&ProfileId>) -> Result<Vec<GoalRecord>> {
    self.get("/goals", &profile_filter(by)).await
  }

  /// `POST /api/goals`
  pub async fn publish_goal(&self, from: &ProfileId, goal: &Goal) -> Result<GoalRecord> {
    self.post("/goals", json!({ "from": from, "goal": goal })).await
  }

  // ── Publications ──────────────────────────────────────────────────────────

  /// `POST /api/publications/{id}/hide`
  pub async fn hide(&self, id: &PublicationId, from: &ProfileId) -> Result<()> {
    let path = format!("/publications/{id}/hide");
    let resp = self
      .client
      .post(self.url(&path))
      .json(&json!({ "from": from }))
      .send()
      .await
      .with_context(|| format!("POST {path} failed"))?;
    check(resp, &format!("POST {path}")).await?;
    Ok(())
  }
}

fn profile_filter(by: Option<&ProfileId>) -> Vec<(&'static str, &str)> {
  by.map(|id| vec![("profile_id", id.as_str())]).unwrap_or_default()
}

/// Turn a non-success response into an error carrying the API's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<Value>()
    .await
    .ok()
    .and_then(|body| body["error"].as_str().map(str::to_owned))
    .unwrap_or_default();
  Err(anyhow!("{what} → {status}: {message}"))
}
