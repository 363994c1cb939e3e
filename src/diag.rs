//! Diagnostics returned to the orchestrator instead of raw errors.

// self
use crate::_prelude::*;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
	/// Operation failed.
	Error,
	/// Operation succeeded with a caveat.
	Warning,
}
impl Display for Severity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Error => f.write_str("error"),
			Self::Warning => f.write_str("warning"),
		}
	}
}

/// One step of an [`AttributePath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathStep {
	/// Named attribute.
	Attribute(String),
	/// List element.
	Index(usize),
	/// Map entry.
	Key(String),
}

/// Location of an attribute inside a resource object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributePath(Vec<PathStep>);
impl AttributePath {
	/// Path rooted at a top-level attribute.
	pub fn root(name: impl Into<String>) -> Self {
		Self(vec![PathStep::Attribute(name.into())])
	}

	/// Extends the path with a nested attribute.
	pub fn attribute(mut self, name: impl Into<String>) -> Self {
		self.0.push(PathStep::Attribute(name.into()));

		self
	}

	/// Extends the path with a list index.
	pub fn index(mut self, index: usize) -> Self {
		self.0.push(PathStep::Index(index));

		self
	}

	/// Extends the path with a map key.
	pub fn key(mut self, key: impl Into<String>) -> Self {
		self.0.push(PathStep::Key(key.into()));

		self
	}

	/// Prepends a parent step, used when errors bubble out of nested values.
	pub fn within(mut self, parent: PathStep) -> Self {
		self.0.insert(0, parent);

		self
	}

	/// Returns the path steps.
	pub fn steps(&self) -> &[PathStep] {
		&self.0
	}

	/// Returns `true` for the empty (whole-object) path.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Display for AttributePath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for (idx, step) in self.0.iter().enumerate() {
			match step {
				PathStep::Attribute(name) if idx == 0 => f.write_str(name)?,
				PathStep::Attribute(name) => write!(f, ".{name}")?,
				PathStep::Index(index) => write!(f, "[{index}]")?,
				PathStep::Key(key) => write!(f, "[{key:?}]")?,
			}
		}

		Ok(())
	}
}

/// Structured error or warning record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
	/// Severity level.
	pub severity: Severity,
	/// Short summary.
	pub summary: String,
	/// Longer explanation, usually embedding the underlying error text.
	pub detail: String,
	/// Attribute the diagnostic is attached to, if any.
	pub path: Option<AttributePath>,
}
impl Diagnostic {
	/// Error diagnostic without an attribute path.
	pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
		Self { severity: Severity::Error, summary: summary.into(), detail: detail.into(), path: None }
	}

	/// Warning diagnostic without an attribute path.
	pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			severity: Severity::Warning,
			summary: summary.into(),
			detail: detail.into(),
			path: None,
		}
	}

	/// Attaches an attribute path.
	pub fn with_path(mut self, path: AttributePath) -> Self {
		self.path = Some(path);

		self
	}

	/// Returns `true` for error severity.
	pub fn is_error(&self) -> bool {
		matches!(self.severity, Severity::Error)
	}
}
impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.path {
			Some(path) => write!(f, "{}: {} ({path}): {}", self.severity, self.summary, self.detail),
			None => write!(f, "{}: {}: {}", self.severity, self.summary, self.detail),
		}
	}
}

/// Ordered collection of diagnostics produced by one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics(Vec<Diagnostic>);
impl Diagnostics {
	/// Appends a diagnostic.
	pub fn push(&mut self, diagnostic: Diagnostic) {
		self.0.push(diagnostic);
	}

	/// Appends an error diagnostic.
	pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
		self.push(Diagnostic::error(summary, detail));
	}

	/// Appends an error diagnostic attached to an attribute.
	pub fn add_attribute_error(
		&mut self,
		path: &AttributePath,
		summary: impl Into<String>,
		detail: impl Into<String>,
	) {
		self.push(Diagnostic::error(summary, detail).with_path(path.clone()));
	}

	/// Appends a warning diagnostic.
	pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
		self.push(Diagnostic::warning(summary, detail));
	}

	/// Returns `true` if any diagnostic has error severity.
	pub fn has_error(&self) -> bool {
		self.0.iter().any(Diagnostic::is_error)
	}

	/// Iterates over error diagnostics only.
	pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
		self.0.iter().filter(|diagnostic| diagnostic.is_error())
	}

	/// Iterates over all diagnostics.
	pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
		self.0.iter()
	}

	/// Number of diagnostics.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when nothing was reported.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<Diagnostics> for Diagnostics {
	fn as_ref(&self) -> &Diagnostics {
		self
	}
}
impl From<Diagnostic> for Diagnostics {
	fn from(diagnostic: Diagnostic) -> Self {
		Self(vec![diagnostic])
	}
}
impl IntoIterator for Diagnostics {
	type IntoIter = std::vec::IntoIter<Diagnostic>;
	type Item = Diagnostic;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
impl Display for Diagnostics {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for (idx, diagnostic) in self.0.iter().enumerate() {
			if idx > 0 {
				f.write_str("; ")?;
			}

			Display::fmt(diagnostic, f)?;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn paths_render_attributes_indices_and_keys() {
		let path = AttributePath::root("social_providers").index(0).attribute("provider_name");

		assert_eq!(path.to_string(), "social_providers[0].provider_name");
		assert_eq!(AttributePath::root("pages").key("login").to_string(), "pages[\"login\"]");
		assert_eq!(
			AttributePath::root("social_id").within(PathStep::Index(2)).to_string(),
			"[2].social_id"
		);
	}

	#[test]
	fn warnings_do_not_count_as_errors() {
		let mut diags = Diagnostics::default();

		diags.add_warning("Heads up", "nothing failed");

		assert!(!diags.has_error());

		diags.add_attribute_error(&AttributePath::root("url"), "Invalid", "bad url");

		assert!(diags.has_error());
		assert_eq!(diags.errors().count(), 1);
		assert_eq!(diags.len(), 2);
		assert_eq!(
			diags.to_string(),
			"warning: Heads up: nothing failed; error: Invalid (url): bad url"
		);
	}
}
