//! Session context: who is signed in and which profile acts.
//!
//! Holds the signed-in owner address, the profiles loaded for that owner and
//! the selected profile. It is an ordinary value owned by the caller and
//! passed to whatever needs it; loading and clearing are explicit.

use crate::{
  Error, Result,
  profile::{Profile, ProfileId},
};

#[derive(Debug, Clone, Default)]
pub struct AppContext {
  owner:    Option<String>,
  profiles: Vec<Profile>,
  selected: Option<usize>,
}

impl AppContext {
  pub fn new() -> Self { Self::default() }

  /// Load `owner`'s profiles. The first profile becomes the selected one.
  pub fn sign_in(&mut self, owner: impl Into<String>, profiles: Vec<Profile>) {
    self.owner = Some(owner.into());
    self.selected = if profiles.is_empty() { None } else { Some(0) };
    self.profiles = profiles;
  }

  /// Forget the owner, profiles and selection.
  pub fn sign_out(&mut self) { *self = Self::default(); }

  pub fn is_signed_in(&self) -> bool { self.owner.is_some() }

  pub fn owner(&self) -> Option<&str> { self.owner.as_deref() }

  pub fn profiles(&self) -> &[Profile] { &self.profiles }

  /// Switch to another of the loaded profiles.
  pub fn select_profile(&mut self, id: &ProfileId) -> Result<&Profile> {
    let index = self
      .profiles
      .iter()
      .position(|p| &p.id == id)
      .ok_or_else(|| Error::ProfileNotLoaded(id.clone()))?;
    self.selected = Some(index);
    Ok(&self.profiles[index])
  }

  pub fn current_profile(&self) -> Option<&Profile> {
    self.selected.and_then(|i| self.profiles.get(i))
  }

  /// The acting profile, or [`Error::NotSignedIn`].
  pub fn require_profile(&self) -> Result<&Profile> { self.current_profile().ok_or(Error::NotSignedIn) }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn profile(id: &str, handle: &str) -> Profile {
    Profile {
      id:         ProfileId::new(id),
      handle:     handle.to_owned(),
      owned_by:   "0xabc".to_owned(),
      attributes: vec![],
      created_at: Utc::now(),
    }
  }

  #[test]
  fn empty_context_has_no_profile() {
    let ctx = AppContext::new();
    assert!(!ctx.is_signed_in());
    assert!(matches!(ctx.require_profile(), Err(Error::NotSignedIn)));
  }

  #[test]
  fn sign_in_selects_first_profile() {
    let mut ctx = AppContext::new();
    ctx.sign_in("0xabc", vec![profile("0x01", "org"), profile("0x02", "vol")]);
    assert_eq!(ctx.owner(), Some("0xabc"));
    assert_eq!(ctx.require_profile().unwrap().handle, "org");
  }

  #[test]
  fn select_profile_switches_or_fails() {
    let mut ctx = AppContext::new();
    ctx.sign_in("0xabc", vec![profile("0x01", "org"), profile("0x02", "vol")]);

    ctx.select_profile(&ProfileId::new("0x02")).unwrap();
    assert_eq!(ctx.current_profile().unwrap().handle, "vol");

    let err = ctx.select_profile(&ProfileId::new("0x09")).unwrap_err();
    assert!(matches!(err, Error::ProfileNotLoaded(id) if id.as_str() == "0x09"));
    assert_eq!(ctx.current_profile().unwrap().handle, "vol");
  }

  #[test]
  fn sign_out_clears_everything() {
    let mut ctx = AppContext::new();
    ctx.sign_in("0xabc", vec![profile("0x01", "org")]);
    ctx.sign_out();
    assert!(!ctx.is_signed_in());
    assert!(ctx.profiles().is_empty());
    assert!(ctx.current_profile().is_none());
  }

  #[test]
  fn owner_without_profiles_is_signed_in_but_cannot_act() {
    let mut ctx = AppContext::new();
    ctx.sign_in("0xabc", vec![]);
    assert!(ctx.is_signed_in());
    assert!(ctx.require_profile().is_err());
  }
}
