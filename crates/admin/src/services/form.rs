//! Product and category form controllers.
//!
//! Each controller owns a draft (new or initialized from an existing entity),
//! applies field edits, and runs the submit protocol: validate locally, then
//! upload a staged image if one exists, then hand the coerced payload to the
//! caller's save callback. Validation failures never reach a gateway, and an
//! upload failure aborts the submission before anything is saved; there is
//! no partial persistence.
//!
//! The `sizes` and `details` lists are edited through a single
//! comma-separated text input: every edit re-splits on commas, trims, and
//! drops empty tokens; rendering joins the list back with `", "`.

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;

use luxe_admin_core::{Category, Product};

use crate::imgbb::{ImageHost, UploadError};
use crate::services::catalog::SaveError;

/// The dropdown sentinel that reveals the free-text custom-category field.
pub const CUSTOM_CATEGORY: &str = "custom";

/// Dropdown choices for the product category selector.
///
/// `known` is the current categories collection, read once when the form
/// opens (`DataGateway::get_all(Collection::Categories)` or the live
/// categories binding); the [`CUSTOM_CATEGORY`] sentinel is appended last.
#[must_use]
pub fn category_choices(known: &[Category]) -> Vec<String> {
    known
        .iter()
        .map(|c| c.name.clone())
        .chain(std::iter::once(CUSTOM_CATEGORY.to_owned()))
        .collect()
}

/// Local validation failures, checked in this order at submit time.
///
/// Resolved entirely locally; a draft that fails validation causes no
/// gateway call of any kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field (name, category, price, stock, or image) is missing.
    #[error("all required fields (name, category, price, stock, image) must be filled")]
    MissingFields,

    /// Price does not parse to a number greater than zero.
    #[error("price must be a number greater than 0")]
    InvalidPrice,

    /// Stock does not parse to a non-negative integer.
    #[error("stock must be a non-negative integer")]
    InvalidStock,
}

/// Everything that can abort a form submission.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The staged image could not be uploaded; the draft was not saved.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The image was uploaded (or none was staged) but the save failed.
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Draft open for edits.
    Editing,
    /// Upload and save in flight; all inputs disabled.
    Submitting,
    /// Submit succeeded; the draft is gone.
    Saved,
    /// Draft discarded without saving.
    Cancelled,
}

/// A locally selected image that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl StagedImage {
    /// Stage a local file for upload.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Local preview URI shown until the upload happens. Never persisted.
    #[must_use]
    pub fn preview_url(&self) -> String {
        format!("preview://{}", self.file_name)
    }
}

/// Split a comma-separated input into trimmed, non-empty tokens.
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Render a list back into its text-input form.
fn join_list(items: &[String]) -> String {
    items.join(", ")
}

// =============================================================================
// Product form
// =============================================================================

/// Editable product draft. Numeric fields stay raw text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    /// Raw price input; coerced to [`Decimal`] at submit.
    pub price: String,
    /// Raw stock input; coerced to an integer at submit.
    pub stock: String,
    pub sizes: Vec<String>,
    pub description: String,
    pub details: Vec<String>,
    /// Existing hosted URL, or a local preview URI once a file is staged.
    pub image: String,
}

impl ProductDraft {
    /// Current text rendering of the sizes list.
    #[must_use]
    pub fn sizes_text(&self) -> String {
        join_list(&self.sizes)
    }

    /// Re-parse the sizes list from its text input.
    pub fn set_sizes_text(&mut self, text: &str) {
        self.sizes = split_list(text);
    }

    /// Current text rendering of the details list.
    #[must_use]
    pub fn details_text(&self) -> String {
        join_list(&self.details)
    }

    /// Re-parse the details list from its text input.
    pub fn set_details_text(&mut self, text: &str) {
        self.details = split_list(text);
    }

    /// Apply a category dropdown selection (one of [`category_choices`]).
    ///
    /// Selecting the [`CUSTOM_CATEGORY`] sentinel stores the sentinel itself;
    /// the revealed free-text field then overwrites `category` directly via
    /// [`set_custom_category`](Self::set_custom_category).
    pub fn select_category(&mut self, choice: &str) {
        self.category = choice.to_owned();
    }

    /// Overwrite the category from the custom free-text field.
    pub fn set_custom_category(&mut self, text: &str) {
        self.category = text.to_owned();
    }

    /// Whether the custom-category text field should be shown.
    #[must_use]
    pub fn is_custom_category(&self) -> bool {
        self.category == CUSTOM_CATEGORY
    }
}

/// Controller for creating or editing a product.
#[derive(Debug)]
pub struct ProductForm {
    draft: ProductDraft,
    staged: Option<StagedImage>,
    existing: Option<Product>,
    state: FormState,
}

impl ProductForm {
    /// Start a blank create-mode draft.
    #[must_use]
    pub fn create() -> Self {
        Self {
            draft: ProductDraft::default(),
            staged: None,
            existing: None,
            state: FormState::Editing,
        }
    }

    /// Start an edit-mode draft from an existing product.
    #[must_use]
    pub fn edit(product: &Product) -> Self {
        Self {
            draft: ProductDraft {
                name: product.name.clone(),
                category: product.category.clone(),
                price: product.price.to_string(),
                stock: product.stock.to_string(),
                sizes: product.sizes.clone(),
                description: product.description.clone(),
                details: product.details.clone(),
                image: product.image.clone(),
            },
            staged: None,
            existing: Some(product.clone()),
            state: FormState::Editing,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    /// Read access to the draft.
    #[must_use]
    pub const fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    /// Mutable access to the draft; `None` unless the form is editing
    /// (inputs are disabled while a submit is in flight).
    pub fn draft_mut(&mut self) -> Option<&mut ProductDraft> {
        (self.state == FormState::Editing).then_some(&mut self.draft)
    }

    /// Stage a locally selected image file and switch the preview to it.
    ///
    /// No-op unless the form is editing.
    pub fn stage_image(&mut self, file_name: &str, bytes: Vec<u8>) {
        if self.state != FormState::Editing {
            return;
        }
        let staged = StagedImage::new(file_name, bytes);
        self.draft.image = staged.preview_url();
        self.staged = Some(staged);
    }

    /// Discard the draft unconditionally.
    pub fn cancel(&mut self) {
        self.state = FormState::Cancelled;
    }

    fn validate(&self) -> Result<(Decimal, u32), ValidationError> {
        let d = &self.draft;
        let has_image = !d.image.is_empty() || self.staged.is_some();
        if d.name.is_empty()
            || d.category.is_empty()
            || d.price.is_empty()
            || d.stock.is_empty()
            || !has_image
        {
            return Err(ValidationError::MissingFields);
        }

        let price: Decimal = d
            .price
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidPrice)?;
        if price <= Decimal::ZERO {
            return Err(ValidationError::InvalidPrice);
        }

        let stock: i64 = d
            .stock
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidStock)?;
        let stock = u32::try_from(stock).map_err(|_| ValidationError::InvalidStock)?;

        Ok((price, stock))
    }

    /// Run the submit protocol.
    ///
    /// Validates in order (missing fields, price, stock), uploads the staged
    /// image if any, then hands the coerced payload to `save`. The form stays
    /// in `Submitting` for the full upload + save duration and returns to
    /// `Editing` on any failure so the draft can be corrected and retried.
    ///
    /// The caller's `save` decides create vs update from the payload's `id`.
    ///
    /// # Errors
    ///
    /// [`FormError::Validation`] without any gateway call,
    /// [`FormError::Upload`] if the staged image is rejected (nothing is
    /// saved), or [`FormError::Save`] from the callback.
    pub async fn submit<F, Fut>(
        &mut self,
        images: &dyn ImageHost,
        save: F,
    ) -> Result<Product, FormError>
    where
        F: FnOnce(Product) -> Fut,
        Fut: Future<Output = Result<(), SaveError>>,
    {
        let (price, stock) = self.validate()?;
        self.state = FormState::Submitting;

        let image = match self.resolve_image(images).await {
            Ok(url) => url,
            Err(e) => {
                self.state = FormState::Editing;
                return Err(e.into());
            }
        };

        let product = Product {
            id: self.existing.as_ref().and_then(|p| p.id.clone()),
            name: self.draft.name.clone(),
            category: self.draft.category.clone(),
            price,
            stock,
            sizes: self.draft.sizes.clone(),
            description: self.draft.description.clone(),
            details: self.draft.details.clone(),
            image,
            created_at: self.existing.as_ref().map_or_else(
                || Utc::now().to_rfc3339(),
                |p| p.created_at.clone(),
            ),
        };

        tracing::info!(name = %product.name, editing = product.id.is_some(), "saving product");
        match save(product.clone()).await {
            Ok(()) => {
                self.state = FormState::Saved;
                Ok(product)
            }
            Err(e) => {
                tracing::error!(error = %e, "product save failed");
                self.state = FormState::Editing;
                Err(e.into())
            }
        }
    }

    async fn resolve_image(&self, images: &dyn ImageHost) -> Result<String, UploadError> {
        match &self.staged {
            Some(staged) => {
                let url = images
                    .upload(&staged.file_name, staged.bytes.clone())
                    .await?;
                Ok(url.into())
            }
            // No new file selected: keep the existing URL unchanged.
            None => Ok(self.draft.image.clone()),
        }
    }
}

// =============================================================================
// Category form
// =============================================================================

/// Editable category draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    /// Existing hosted URL, or a local preview URI once a file is staged.
    pub image: String,
}

/// Controller for creating or editing a category.
///
/// Same submit protocol as [`ProductForm`] minus the numeric checks: the only
/// validation is that name and image are present.
#[derive(Debug)]
pub struct CategoryForm {
    draft: CategoryDraft,
    staged: Option<StagedImage>,
    existing: Option<Category>,
    state: FormState,
}

impl CategoryForm {
    /// Start a blank create-mode draft.
    #[must_use]
    pub fn create() -> Self {
        Self {
            draft: CategoryDraft::default(),
            staged: None,
            existing: None,
            state: FormState::Editing,
        }
    }

    /// Start an edit-mode draft from an existing category.
    #[must_use]
    pub fn edit(category: &Category) -> Self {
        Self {
            draft: CategoryDraft {
                name: category.name.clone(),
                image: category.image.clone(),
            },
            staged: None,
            existing: Some(category.clone()),
            state: FormState::Editing,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    /// Read access to the draft.
    #[must_use]
    pub const fn draft(&self) -> &CategoryDraft {
        &self.draft
    }

    /// Mutable access to the draft; `None` while a submit is in flight.
    pub fn draft_mut(&mut self) -> Option<&mut CategoryDraft> {
        (self.state == FormState::Editing).then_some(&mut self.draft)
    }

    /// Stage a locally selected image file and switch the preview to it.
    pub fn stage_image(&mut self, file_name: &str, bytes: Vec<u8>) {
        if self.state != FormState::Editing {
            return;
        }
        let staged = StagedImage::new(file_name, bytes);
        self.draft.image = staged.preview_url();
        self.staged = Some(staged);
    }

    /// Discard the draft unconditionally.
    pub fn cancel(&mut self) {
        self.state = FormState::Cancelled;
    }

    /// Run the submit protocol: validate, upload if staged, save.
    ///
    /// # Errors
    ///
    /// Same contract as [`ProductForm::submit`], without the price/stock
    /// variants.
    pub async fn submit<F, Fut>(
        &mut self,
        images: &dyn ImageHost,
        save: F,
    ) -> Result<Category, FormError>
    where
        F: FnOnce(Category) -> Fut,
        Fut: Future<Output = Result<(), SaveError>>,
    {
        if self.draft.name.is_empty() || (self.draft.image.is_empty() && self.staged.is_none()) {
            return Err(ValidationError::MissingFields.into());
        }
        self.state = FormState::Submitting;

        let image = match &self.staged {
            Some(staged) => match images.upload(&staged.file_name, staged.bytes.clone()).await {
                Ok(url) => url.into(),
                Err(e) => {
                    self.state = FormState::Editing;
                    return Err(e.into());
                }
            },
            None => self.draft.image.clone(),
        };

        let category = Category {
            id: self.existing.as_ref().and_then(|c| c.id.clone()),
            name: self.draft.name.clone(),
            image,
        };

        tracing::info!(name = %category.name, editing = category.id.is_some(), "saving category");
        match save(category.clone()).await {
            Ok(()) => {
                self.state = FormState::Saved;
                Ok(category)
            }
            Err(e) => {
                tracing::error!(error = %e, "category save failed");
                self.state = FormState::Editing;
                Err(e.into())
            }
        }
    }
}
