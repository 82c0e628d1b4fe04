//! In-memory host backed by a document snapshot file.
//!
//! The snapshot is a JSON (or YAML) export of pages, nested layers and the
//! style catalog. Binding writes mutate the in-memory copy, which can be
//! saved back with [`Document::save`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AuditError;
use crate::host::{DocumentReader, DocumentWriter, HostError, PageRef};
use crate::types::{
    NodeId, NodeRecord, NodeType, PaintStyle, StyleBinding, StyleKind, TextAttributes,
    TextSegment, TextStyle,
};

type Result<T, E = AuditError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    /// Defaults to the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<NodeId>,
    #[serde(default)]
    pub selection: Vec<NodeId>,
    pub pages: Vec<PageFile>,
    #[serde(default)]
    pub paint_styles: Vec<PaintStyle>,
    #[serde(default)]
    pub text_styles: Vec<TextStyle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFile {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_style_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_style_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style_id: Option<String>,
    #[serde(flatten)]
    pub text: TextAttributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<TextSegment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn record(&self, parent: NodeId) -> NodeRecord {
        NodeRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            node_type: self.node_type,
            parent: Some(parent),
            fills: self.fills.clone(),
            strokes: self.strokes.clone(),
            fill_style: StyleBinding::from_raw(self.fill_style_id.as_deref()),
            stroke_style: StyleBinding::from_raw(self.stroke_style_id.as_deref()),
            text_style: StyleBinding::from_raw(self.text_style_id.as_deref()),
            text: self.node_type.is_text().then(|| self.text.clone()),
        }
    }

    fn push_descendants(&self, out: &mut Vec<NodeId>) {
        for child in &self.children {
            out.push(child.id.clone());
            child.push_descendants(out);
        }
    }
}

/// Where a layer sits: page index plus child indices from the page down.
#[derive(Debug, Clone)]
struct Location {
    page: usize,
    path: Vec<usize>,
}

#[derive(Debug)]
struct State {
    file: DocumentFile,
    index: HashMap<NodeId, Location>,
    current_page: usize,
    selection: Vec<NodeId>,
    viewport_target: Option<NodeId>,
    notifications: Vec<String>,
}

impl State {
    fn find(&self, id: &NodeId) -> Option<&SceneNode> {
        let loc = self.index.get(id)?;
        let (first, rest) = loc.path.split_first()?;
        let mut node = self.file.pages.get(loc.page)?.children.get(*first)?;
        for &i in rest {
            node = node.children.get(i)?;
        }
        Some(node)
    }

    fn find_mut(&mut self, id: &NodeId) -> Option<&mut SceneNode> {
        let loc = self.index.get(id)?.clone();
        let (first, rest) = loc.path.split_first()?;
        let mut node = self.file.pages.get_mut(loc.page)?.children.get_mut(*first)?;
        for &i in rest {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    fn parent_of(&self, id: &NodeId) -> Option<NodeId> {
        let loc = self.index.get(id)?;
        let page = self.file.pages.get(loc.page)?;
        let (_, ancestors) = loc.path.split_last()?;
        let Some((first, rest)) = ancestors.split_first() else {
            return Some(page.id.clone());
        };
        let mut node = page.children.get(*first)?;
        for &i in rest {
            node = node.children.get(i)?;
        }
        Some(node.id.clone())
    }

    fn page_index(&self, id: &NodeId) -> Option<usize> {
        self.file.pages.iter().position(|p| &p.id == id)
    }

    fn style_exists(&self, kind: StyleKind, style_id: &str) -> bool {
        match kind {
            StyleKind::Text => self.file.text_styles.iter().any(|s| s.id == style_id),
            StyleKind::Fill | StyleKind::Stroke => {
                self.file.paint_styles.iter().any(|s| s.id == style_id)
            }
        }
    }
}

fn index_children(
    children: &[SceneNode],
    page: usize,
    prefix: &mut Vec<usize>,
    index: &mut HashMap<NodeId, Location>,
) -> Result<()> {
    for (i, child) in children.iter().enumerate() {
        prefix.push(i);
        let loc = Location {
            page,
            path: prefix.clone(),
        };
        if index.insert(child.id.clone(), loc).is_some() {
            return Err(AuditError::config(format!("duplicate node id {}", child.id)));
        }
        index_children(&child.children, page, prefix, index)?;
        prefix.pop();
    }
    Ok(())
}

/// A document snapshot acting as the host.
#[derive(Debug)]
pub struct Document {
    state: RefCell<State>,
}

impl Document {
    pub fn new(file: DocumentFile) -> Result<Self> {
        if file.pages.is_empty() {
            return Err(AuditError::config("document has no pages"));
        }
        let mut index = HashMap::new();
        for (page, entry) in file.pages.iter().enumerate() {
            index_children(&entry.children, page, &mut Vec::new(), &mut index)?;
        }
        let current_page = match &file.current_page {
            Some(id) => file
                .pages
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| AuditError::config(format!("current page {id} does not exist")))?,
            None => 0,
        };
        let selection: Vec<NodeId> = file
            .selection
            .iter()
            .filter(|id| index.contains_key(*id))
            .cloned()
            .collect();
        if selection.len() != file.selection.len() {
            log::warn!("dropped selected ids that are not in the document");
        }

        Ok(Self {
            state: RefCell::new(State {
                file,
                index,
                current_page,
                selection,
                viewport_target: None,
                notifications: Vec::new(),
            }),
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::new(serde_json::from_str(raw)?)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Self::new(serde_yaml::from_str(raw)?)
    }

    /// Loads `.yaml`/`.yml` as YAML and anything else as JSON.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        if is_yaml(path) {
            Self::from_yaml_str(&raw)
        } else {
            Self::from_json_str(&raw)
        }
    }

    /// Snapshot of the document including applied bindings, current page
    /// and selection.
    pub fn to_file(&self) -> DocumentFile {
        let state = self.state.borrow();
        let mut file = state.file.clone();
        file.current_page = Some(state.file.pages[state.current_page].id.clone());
        file.selection = state.selection.clone();
        file
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = self.to_file();
        let content = if is_yaml(path) {
            serde_yaml::to_string(&file)?
        } else {
            serde_json::to_string_pretty(&file)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replaces the selection as a user would; no ids are validated.
    pub fn select(&self, ids: Vec<NodeId>) {
        self.state.borrow_mut().selection = ids;
    }

    pub fn current_selection(&self) -> Vec<NodeId> {
        self.state.borrow().selection.clone()
    }

    pub fn current_page_id(&self) -> NodeId {
        let state = self.state.borrow();
        state.file.pages[state.current_page].id.clone()
    }

    pub fn viewport_target(&self) -> Option<NodeId> {
        self.state.borrow().viewport_target.clone()
    }

    /// Drains notifications sent since the last call.
    pub fn take_notifications(&self) -> Vec<String> {
        std::mem::take(&mut self.state.borrow_mut().notifications)
    }

    /// Drops a layer from the lookup table, as if it had been deleted.
    pub fn forget(&self, id: &NodeId) {
        let mut state = self.state.borrow_mut();
        state.index.remove(id);
        state.selection.retain(|s| s != id);
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl DocumentReader for Document {
    async fn selection(&self) -> Result<Vec<NodeId>, HostError> {
        Ok(self.state.borrow().selection.clone())
    }

    async fn current_page(&self) -> Result<PageRef, HostError> {
        let state = self.state.borrow();
        let page = &state.file.pages[state.current_page];
        Ok(PageRef {
            id: page.id.clone(),
            name: page.name.clone(),
        })
    }

    async fn page_nodes(&self) -> Result<Vec<NodeId>, HostError> {
        let state = self.state.borrow();
        let mut out = Vec::new();
        for child in &state.file.pages[state.current_page].children {
            if state.index.contains_key(&child.id) {
                out.push(child.id.clone());
                child.push_descendants(&mut out);
            }
        }
        out.retain(|id| state.index.contains_key(id));
        Ok(out)
    }

    async fn descendants(&self, id: &NodeId) -> Result<Vec<NodeId>, HostError> {
        let state = self.state.borrow();
        if let Some(page) = state.page_index(id) {
            let mut out = Vec::new();
            for child in &state.file.pages[page].children {
                out.push(child.id.clone());
                child.push_descendants(&mut out);
            }
            return Ok(out);
        }
        let node = state
            .find(id)
            .ok_or_else(|| HostError::NodeNotFound(id.to_string()))?;
        let mut out = Vec::new();
        node.push_descendants(&mut out);
        out.retain(|d| state.index.contains_key(d));
        Ok(out)
    }

    async fn node(&self, id: &NodeId) -> Result<Option<NodeRecord>, HostError> {
        let state = self.state.borrow();
        if let Some(page) = state.page_index(id) {
            let page = &state.file.pages[page];
            return Ok(Some(NodeRecord {
                id: page.id.clone(),
                name: page.name.clone(),
                node_type: NodeType::Page,
                parent: None,
                fills: None,
                strokes: None,
                fill_style: StyleBinding::Unbound,
                stroke_style: StyleBinding::Unbound,
                text_style: StyleBinding::Unbound,
                text: None,
            }));
        }
        let Some(node) = state.find(id) else {
            return Ok(None);
        };
        let parent = state
            .parent_of(id)
            .ok_or_else(|| HostError::Other(format!("no parent recorded for {id}")))?;
        Ok(Some(node.record(parent)))
    }

    async fn text_segments(&self, id: &NodeId) -> Result<Vec<TextSegment>, HostError> {
        let state = self.state.borrow();
        let node = state
            .find(id)
            .ok_or_else(|| HostError::NodeNotFound(id.to_string()))?;
        if !node.node_type.is_text() {
            return Ok(Vec::new());
        }
        Ok(node.segments.clone())
    }

    async fn paint_styles(&self) -> Result<Vec<PaintStyle>, HostError> {
        Ok(self.state.borrow().file.paint_styles.clone())
    }

    async fn text_styles(&self) -> Result<Vec<TextStyle>, HostError> {
        Ok(self.state.borrow().file.text_styles.clone())
    }
}

impl DocumentWriter for Document {
    async fn set_style_binding(
        &self,
        id: &NodeId,
        kind: StyleKind,
        style_id: &str,
    ) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        if !state.style_exists(kind, style_id) {
            return Err(HostError::Rejected(format!("unknown {kind} style {style_id}")));
        }
        let node = state
            .find_mut(id)
            .ok_or_else(|| HostError::NodeNotFound(id.to_string()))?;
        let ty = node.node_type;
        let slot = match kind {
            StyleKind::Text if ty.is_text() => &mut node.text_style_id,
            StyleKind::Fill if ty.supports_fills() => &mut node.fill_style_id,
            StyleKind::Stroke if ty.supports_strokes() => &mut node.stroke_style_id,
            _ => {
                return Err(HostError::Inapplicable {
                    kind,
                    node: ty.to_string(),
                })
            }
        };
        *slot = Some(style_id.to_string());
        Ok(())
    }

    async fn set_current_page(&self, page: &NodeId) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        let index = state
            .page_index(page)
            .ok_or_else(|| HostError::NodeNotFound(page.to_string()))?;
        state.current_page = index;
        Ok(())
    }

    async fn set_selection(&self, ids: &[NodeId]) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        if let Some(missing) = ids.iter().find(|id| !state.index.contains_key(*id)) {
            return Err(HostError::NodeNotFound(missing.to_string()));
        }
        state.selection = ids.to_vec();
        Ok(())
    }

    async fn scroll_into_view(&self, id: &NodeId) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        if !state.index.contains_key(id) {
            return Err(HostError::NodeNotFound(id.to_string()));
        }
        state.viewport_target = Some(id.clone());
        Ok(())
    }

    fn notify(&self, message: &str) {
        log::info!("notify: {message}");
        self.state
            .borrow_mut()
            .notifications
            .push(message.to_string());
    }
}
