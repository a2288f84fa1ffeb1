//! In-memory builder canvas for one editing session.
//!
//! A [`Canvas`] owns the ordered section list of one page, the selection
//! pointer, and the focus context used for cursor-aware token insertion.
//! All mutations are synchronous and applied in call order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::markup::{wrap_selection, Mark};
use crate::section::{default_content, merge_shallow, Section, SectionContent, SectionId, SectionStyle, SectionType};
use crate::substitution::Variable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// A text field inside one section's content, addressed by a dotted path
/// such as `headline` or `featureItems.1.title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRef {
    pub section_id: SectionId,
    pub path: String,
}

impl FieldRef {
    pub fn new(section_id: SectionId, path: impl Into<String>) -> Self {
        FieldRef {
            section_id,
            path: path.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Focus context
// ---------------------------------------------------------------------------

/// Last focused text field and cursor offset (in chars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusContext {
    pub field: FieldRef,
    pub cursor: usize,
}

/// Session-owned focus state, updated from editor events and consumed once
/// by the next token insertion. Blur leaves it in place so a toolbar click
/// still sees the last cursor.
#[derive(Debug, Clone, Default)]
pub struct FocusTracker {
    last: Option<FocusContext>,
}

impl FocusTracker {
    pub fn on_focus(&mut self, field: FieldRef, cursor: usize) {
        self.last = Some(FocusContext { field, cursor });
    }

    /// Cursor moved or keys typed inside `field`.
    pub fn on_selection_change(&mut self, field: &FieldRef, cursor: usize) {
        match &mut self.last {
            Some(ctx) if ctx.field == *field => ctx.cursor = cursor,
            _ => self.on_focus(field.clone(), cursor),
        }
    }

    pub fn peek(&self) -> Option<&FocusContext> {
        self.last.as_ref()
    }

    pub fn take(&mut self) -> Option<FocusContext> {
        self.last.take()
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    sections: Vec<Section>,
    selected: Option<SectionId>,
    pub focus: FocusTracker,
}

impl Canvas {
    pub fn new(sections: Vec<Section>) -> Self {
        Canvas {
            sections,
            ..Default::default()
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    pub fn selected(&self) -> Option<&SectionId> {
        self.selected.as_ref()
    }

    pub fn selected_section(&self) -> Option<&Section> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == *id)
    }

    fn position(&self, id: &SectionId) -> Result<usize, CoreError> {
        self.sections
            .iter()
            .position(|s| s.id == *id)
            .ok_or_else(|| CoreError::not_found("Section", id))
    }

    /// Append a section of `ty` built from its defaults and select it.
    pub fn add_section(&mut self, ty: SectionType) -> SectionId {
        let section = Section::new(ty);
        let id = section.id.clone();
        self.sections.push(section);
        self.selected = Some(id.clone());
        id
    }

    /// Remove by id. Returns whether a section was removed.
    pub fn delete_section(&mut self, id: &SectionId) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != *id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.sections.len() != before
    }

    /// Swap with the neighbour in `direction`; no-op at either end.
    pub fn move_section(&mut self, id: &SectionId, direction: Direction) -> Result<(), CoreError> {
        let index = self.position(id)?;
        let neighbour = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|i| *i < self.sections.len()),
        };
        if let Some(other) = neighbour {
            self.sections.swap(index, other);
        }
        Ok(())
    }

    /// Insert a copy with a fresh id right after the original.
    pub fn duplicate_section(&mut self, id: &SectionId) -> Result<SectionId, CoreError> {
        let index = self.position(id)?;
        let copy = self.sections[index].duplicate();
        let copy_id = copy.id.clone();
        self.sections.insert(index + 1, copy);
        Ok(copy_id)
    }

    pub fn select(&mut self, id: Option<SectionId>) -> Result<(), CoreError> {
        if let Some(id) = &id {
            self.position(id)?;
        }
        self.selected = id;
        Ok(())
    }

    /// Shallow-merge `patch` into the section's content. Style is untouched.
    /// A `null` value resets that key to the type's default.
    pub fn update_content(&mut self, id: &SectionId, mut patch: Map<String, Value>) -> Result<(), CoreError> {
        let index = self.position(id)?;
        let section = &mut self.sections[index];
        if let Some(ty) = section.content.section_type() {
            let defaults = default_content(ty).to_value();
            for (key, value) in patch.iter_mut() {
                if value.is_null() {
                    *value = defaults.get(key).cloned().unwrap_or(Value::Null);
                }
            }
            patch.retain(|_, v| !v.is_null());
        }
        let mut value = section.content.to_value();
        let Value::Object(base) = &mut value else {
            return Err(CoreError::Internal(format!("content of {id} is not an object")));
        };
        merge_shallow(base, patch);

        section.content = match section.content.section_type() {
            Some(ty) => SectionContent::from_value(ty, value)
                .map_err(|e| CoreError::Validation(format!("invalid content for {ty}: {e}")))?,
            None => SectionContent::Unknown {
                type_tag: section.content.type_tag().to_string(),
                content: value,
            },
        };
        Ok(())
    }

    /// Shallow-merge `patch` into the section's style. Content is untouched.
    pub fn update_style(&mut self, id: &SectionId, patch: Map<String, Value>) -> Result<(), CoreError> {
        let index = self.position(id)?;
        let section = &mut self.sections[index];
        let mut value = serde_json::to_value(&section.style)
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        let Value::Object(base) = &mut value else {
            return Err(CoreError::Internal(format!("style of {id} is not an object")));
        };
        merge_shallow(base, patch);
        section.style = serde_json::from_value::<SectionStyle>(value)
            .map_err(|e| CoreError::Validation(format!("invalid style: {e}")))?;
        Ok(())
    }

    /// Read a text field of a section's content.
    pub fn field_text(&self, field: &FieldRef) -> Result<String, CoreError> {
        let section = self
            .get(&field.section_id)
            .ok_or_else(|| CoreError::not_found("Section", &field.section_id))?;
        let value = section.content.to_value();
        lookup(&value, &field.path)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CoreError::Validation(format!("{} is not a text field", field.path)))
    }

    fn set_field_text(&mut self, field: &FieldRef, text: String) -> Result<(), CoreError> {
        let index = self.position(&field.section_id)?;
        let mut value = self.sections[index].content.to_value();
        let slot = lookup_mut(&mut value, &field.path)
            .filter(|v| v.is_string())
            .ok_or_else(|| CoreError::Validation(format!("{} is not a text field", field.path)))?;
        *slot = Value::String(text);

        let (head, _) = field.path.split_once('.').unwrap_or((field.path.as_str(), ""));
        let mut patch = Map::new();
        if let Some(top) = value.get(head) {
            patch.insert(head.to_string(), top.clone());
        }
        self.update_content(&field.section_id, patch)
    }

    /// Insert `variable`'s token into `target`.
    ///
    /// When the focus context points at `target` the token lands at its
    /// cursor; otherwise it is appended. The context is consumed either way.
    pub fn insert_variable(&mut self, target: &FieldRef, variable: Variable) -> Result<String, CoreError> {
        let text = self.field_text(target)?;
        let token = variable.token();
        let cursor = self
            .focus
            .take()
            .filter(|ctx| ctx.field == *target)
            .map(|ctx| ctx.cursor);

        let updated = match cursor {
            Some(cursor) => {
                let at = text
                    .char_indices()
                    .nth(cursor)
                    .map_or(text.len(), |(i, _)| i);
                let mut out = String::with_capacity(text.len() + token.len());
                out.push_str(&text[..at]);
                out.push_str(&token);
                out.push_str(&text[at..]);
                out
            }
            None => format!("{text}{token}"),
        };
        self.set_field_text(target, updated.clone())?;
        Ok(updated)
    }

    /// Apply a toolbar mark to the char range `start..end` of `target`.
    pub fn apply_format(
        &mut self,
        target: &FieldRef,
        start: usize,
        end: usize,
        mark: &Mark,
    ) -> Result<String, CoreError> {
        let text = self.field_text(target)?;
        let updated = wrap_selection(&text, start, end, mark);
        self.set_field_text(target, updated.clone())?;
        Ok(updated)
    }

    /// Apply one operation from a client batch.
    pub fn apply(&mut self, op: CanvasOp) -> Result<(), CoreError> {
        match op {
            CanvasOp::Add { section_type } => {
                self.add_section(section_type);
            }
            CanvasOp::Delete { id } => {
                if !self.delete_section(&id) {
                    return Err(CoreError::not_found("Section", &id));
                }
            }
            CanvasOp::Move { id, direction } => self.move_section(&id, direction)?,
            CanvasOp::Duplicate { id } => {
                self.duplicate_section(&id)?;
            }
            CanvasOp::Select { id } => self.select(id)?,
            CanvasOp::UpdateContent { id, patch } => self.update_content(&id, patch)?,
            CanvasOp::UpdateStyle { id, patch } => self.update_style(&id, patch)?,
            CanvasOp::InsertVariable {
                field,
                variable,
                cursor,
            } => {
                if let Some(cursor) = cursor {
                    self.focus.on_focus(field.clone(), cursor);
                }
                self.insert_variable(&field, variable)?;
            }
            CanvasOp::Format {
                field,
                start,
                end,
                mark,
            } => {
                self.apply_format(&field, start, end, &mark)?;
            }
        }
        Ok(())
    }
}

/// One editor mutation, as sent by the builder client.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum CanvasOp {
    #[serde(rename_all = "camelCase")]
    Add { section_type: SectionType },
    Delete { id: SectionId },
    Move { id: SectionId, direction: Direction },
    Duplicate { id: SectionId },
    Select { id: Option<SectionId> },
    UpdateContent { id: SectionId, patch: Map<String, Value> },
    UpdateStyle { id: SectionId, patch: Map<String, Value> },
    InsertVariable {
        field: FieldRef,
        variable: Variable,
        /// Cursor in `field` when the client tracked one.
        #[serde(default)]
        cursor: Option<usize>,
    },
    Format {
        field: FieldRef,
        start: usize,
        end: usize,
        mark: Mark,
    },
}

fn lookup<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(value, |v, key| match v {
        Value::Object(map) => map.get(key),
        Value::Array(items) => items.get(key.parse::<usize>().ok()?),
        _ => None,
    })
}

fn lookup_mut<'v>(value: &'v mut Value, path: &str) -> Option<&'v mut Value> {
    path.split('.').try_fold(value, |v, key| match v {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => items.get_mut(key.parse::<usize>().ok()?),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::section::default_style;

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("patch must be an object"),
        }
    }

    fn ids(canvas: &Canvas) -> Vec<SectionId> {
        canvas.sections().iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn add_appends_defaults_and_selects() {
        let mut canvas = Canvas::default();
        canvas.add_section(SectionType::Hero);
        let id = canvas.add_section(SectionType::Pricing);

        let last = canvas.sections().last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.content, default_content(SectionType::Pricing));
        assert_eq!(last.style, default_style(SectionType::Pricing));
        assert_eq!(canvas.selected(), Some(&id));
    }

    #[test]
    fn move_swaps_and_is_noop_at_edges() {
        let mut canvas = Canvas::default();
        let a = canvas.add_section(SectionType::Headline);
        let b = canvas.add_section(SectionType::Body);
        let c = canvas.add_section(SectionType::Footer);

        canvas.move_section(&a, Direction::Up).unwrap();
        assert_eq!(ids(&canvas), vec![a.clone(), b.clone(), c.clone()]);
        canvas.move_section(&c, Direction::Down).unwrap();
        assert_eq!(ids(&canvas), vec![a.clone(), b.clone(), c.clone()]);

        canvas.move_section(&c, Direction::Up).unwrap();
        assert_eq!(ids(&canvas), vec![a.clone(), c.clone(), b.clone()]);
        canvas.move_section(&a, Direction::Down).unwrap();
        assert_eq!(ids(&canvas), vec![c, a, b]);
    }

    #[test]
    fn delete_clears_selection() {
        let mut canvas = Canvas::default();
        let a = canvas.add_section(SectionType::Headline);
        let b = canvas.add_section(SectionType::Body);

        assert!(canvas.delete_section(&b));
        assert_eq!(canvas.selected(), None);

        canvas.select(Some(a.clone())).unwrap();
        assert!(!canvas.delete_section(&b));
        assert_eq!(canvas.selected(), Some(&a));
    }

    #[test]
    fn duplicate_inserts_after_original() {
        let mut canvas = Canvas::default();
        let a = canvas.add_section(SectionType::Headline);
        let b = canvas.add_section(SectionType::Body);
        let copy = canvas.duplicate_section(&a).unwrap();

        assert_eq!(ids(&canvas), vec![a.clone(), copy.clone(), b]);
        assert_ne!(copy, a);
        assert_eq!(canvas.get(&copy).unwrap().content, canvas.get(&a).unwrap().content);
    }

    #[test]
    fn content_and_style_updates_merge_independently() {
        let mut canvas = Canvas::default();
        let id = canvas.add_section(SectionType::Cta);
        let style_before = canvas.get(&id).unwrap().style.clone();

        canvas
            .update_content(&id, patch(json!({ "headline": "New" })))
            .unwrap();
        let section = canvas.get(&id).unwrap();
        let SectionContent::Cta(cta) = &section.content else {
            panic!("expected cta");
        };
        assert_eq!(cta.headline, "New");
        assert_eq!(cta.button_text, "Get Started");
        assert_eq!(section.style, style_before);

        canvas
            .update_style(&id, patch(json!({ "paddingY": 12 })))
            .unwrap();
        let section = canvas.get(&id).unwrap();
        assert_eq!(section.style.padding_y, Some(12));
        assert_eq!(section.style.background_color, style_before.background_color);
        let SectionContent::Cta(cta) = &section.content else {
            panic!("expected cta");
        };
        assert_eq!(cta.headline, "New");
    }

    #[test]
    fn invalid_update_leaves_section_unchanged() {
        let mut canvas = Canvas::default();
        let id = canvas.add_section(SectionType::Features);
        let before = canvas.get(&id).unwrap().clone();

        let err = canvas
            .update_content(&id, patch(json!({ "featureItems": "nope" })))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert_eq!(canvas.get(&id).unwrap(), &before);
    }

    #[test]
    fn null_in_content_patch_resets_key_to_default() {
        let mut canvas = Canvas::default();
        let id = canvas.add_section(SectionType::Cta);
        canvas
            .update_content(&id, patch(json!({ "headline": "Custom", "buttonText": "Go" })))
            .unwrap();

        canvas
            .update_content(&id, patch(json!({ "buttonText": null })))
            .unwrap();
        let SectionContent::Cta(cta) = &canvas.get(&id).unwrap().content else {
            panic!("expected cta");
        };
        assert_eq!(cta.headline, "Custom");
        assert_eq!(cta.button_text, "Get Started");
    }

    #[test]
    fn insert_variable_uses_matching_cursor_once() {
        let mut canvas = Canvas::default();
        let id = canvas.add_section(SectionType::Headline);
        let field = FieldRef::new(id.clone(), "text");
        canvas
            .update_content(&id, patch(json!({ "text": "Hello there" })))
            .unwrap();

        canvas.focus.on_focus(field.clone(), 0);
        canvas.focus.on_selection_change(&field, 5);
        let text = canvas.insert_variable(&field, Variable::FirstName).unwrap();
        assert_eq!(text, "Hello{{first_name}} there");

        // Context was consumed: the next insert appends.
        let text = canvas.insert_variable(&field, Variable::Company).unwrap();
        assert_eq!(text, "Hello{{first_name}} there{{company}}");
    }

    #[test]
    fn insert_variable_appends_when_focus_is_elsewhere() {
        let mut canvas = Canvas::default();
        let id = canvas.add_section(SectionType::Cta);
        canvas.focus.on_focus(FieldRef::new(id.clone(), "subheadline"), 2);

        let target = FieldRef::new(id, "headline");
        let text = canvas.insert_variable(&target, Variable::LastName).unwrap();
        assert!(text.ends_with("{{last_name}}"));
    }

    #[test]
    fn nested_field_paths() {
        let mut canvas = Canvas::default();
        let id = canvas.add_section(SectionType::Features);
        let field = FieldRef::new(id.clone(), "featureItems.1.title");
        let original = canvas.field_text(&field).unwrap();

        let text = canvas.apply_format(&field, 0, 3, &Mark::Bold).unwrap();
        assert!(text.starts_with("**"));
        assert_eq!(canvas.field_text(&field).unwrap(), text);
        assert_ne!(text, original);

        let first = FieldRef::new(id, "featureItems.0.title");
        assert!(!canvas.field_text(&first).unwrap().starts_with("**"));
    }

    #[test]
    fn ops_deserialize_and_apply() {
        let mut canvas = Canvas::default();
        let ops: Vec<CanvasOp> = serde_json::from_value(json!([
            { "op": "add", "sectionType": "headline" },
            { "op": "add", "sectionType": "body" },
            { "op": "select", "id": null }
        ]))
        .unwrap();
        for op in ops {
            canvas.apply(op).unwrap();
        }
        assert_eq!(canvas.sections().len(), 2);
        assert_eq!(canvas.selected(), None);

        let id = canvas.sections()[0].id.clone();
        let op: CanvasOp = serde_json::from_value(json!({
            "op": "insertVariable",
            "field": { "sectionId": id.as_str(), "path": "text" },
            "variable": "full_name",
            "cursor": 0
        }))
        .unwrap();
        canvas.apply(op).unwrap();
        let text = canvas.field_text(&FieldRef::new(id, "text")).unwrap();
        assert!(text.starts_with("{{full_name}}"));

        let missing = CanvasOp::Delete { id: SectionId::from("missing") };
        assert_matches!(canvas.apply(missing), Err(CoreError::NotFound { .. }));
    }
}
