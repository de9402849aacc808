//! HTML parsing (markup → AST)
//!
//! Pipeline: HTML string → html5ever fragment parser → [AstSink] → Document
//!
//!     The source is parsed as the content of a `<body>` element, not as a document, so
//!     leading whitespace and head-only elements such as `<title>` stay where they are.
//!     html5ever drives the sink with tree construction callbacks. The sink keeps a
//!     lightweight handle tree while parsing, because the tree builder needs to move
//!     nodes around (adoption agency, foster parenting) and look at their parents,
//!     which a finished [Node] can't express. Each element handle carries the AST node
//!     the adapter built for it; [AstSink::finish] folds the handle tree into a
//!     [Document], keeping only what sits under the fragment's `html` root. Template
//!     contents are folded in as the children of their `<template>` element.
//!
//!     Parent links and element namespaces are not stored on the handles. They live in
//!     side tables keyed by handle identity: parents as weak references, so the tables
//!     never keep a node alive or form cycles. Every handle created during the parse is
//!     retained until the sink finishes, so identities stay unique.

use super::adapter::TreeAdapter;
use html5ever::interface::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::interface::ElemName;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    local_name, ns, parse_fragment, Attribute, LocalName, Namespace, ParseOpts, QualName,
};
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use tagdb_parser::{Document, Node, NodeKind};

pub type Handle = Rc<SinkNode>;

#[derive(Debug)]
pub enum SinkData {
    Document,
    Element(Node),
    Text(String),
    Comment,
}

#[derive(Debug)]
pub struct SinkNode {
    local: Option<LocalName>,
    data: RefCell<SinkData>,
    children: RefCell<Vec<Handle>>,
    template_contents: Option<Handle>,
}

impl SinkNode {
    fn new(local: Option<LocalName>, data: SinkData, template_contents: Option<Handle>) -> Self {
        Self {
            local,
            data: RefCell::new(data),
            children: RefCell::new(Vec::new()),
            template_contents,
        }
    }

    fn is_named(&self, name: &str) -> bool {
        self.local.as_ref().is_some_and(|local| &**local == name)
    }
}

/// Element name handed back to the tree builder.
#[derive(Debug, Clone)]
pub struct SinkElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for SinkElemName {
    fn ns(&self) -> &Namespace {
        &self.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.local
    }
}

type NodeId = *const SinkNode;

fn id(handle: &Handle) -> NodeId {
    Rc::as_ptr(handle)
}

pub struct AstSink<'a, A: TreeAdapter> {
    adapter: &'a A,
    document: Handle,
    parents: RefCell<HashMap<NodeId, Weak<SinkNode>>>,
    namespaces: RefCell<HashMap<NodeId, Namespace>>,
    retained: RefCell<Vec<Handle>>,
}

impl<'a, A: TreeAdapter> AstSink<'a, A> {
    pub fn new(adapter: &'a A) -> Self {
        let document = Rc::new(SinkNode::new(None, SinkData::Document, None));
        Self {
            adapter,
            retained: RefCell::new(vec![document.clone()]),
            document,
            parents: RefCell::new(HashMap::new()),
            namespaces: RefCell::new(HashMap::new()),
        }
    }

    fn retain(&self, node: SinkNode) -> Handle {
        let handle = Rc::new(node);
        self.retained.borrow_mut().push(handle.clone());
        handle
    }

    fn parent_of(&self, handle: &Handle) -> Option<Handle> {
        self.parents
            .borrow()
            .get(&id(handle))
            .and_then(|parent| parent.upgrade())
    }

    fn set_parent(&self, child: &Handle, parent: &Handle) {
        self.parents
            .borrow_mut()
            .insert(id(child), Rc::downgrade(parent));
    }

    fn detach(&self, target: &Handle) {
        if let Some(parent) = self.parent_of(target) {
            parent
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(child, target));
        }
        self.parents.borrow_mut().remove(&id(target));
    }

    /// Text for position `index` of `parent`'s children.
    ///
    /// Merges into the text node right before that position. A tagref parent takes the
    /// text as part of its reference instead of as a child.
    fn insert_text_at(&self, parent: &Handle, index: usize, text: &str) {
        if let SinkData::Element(node @ Node::TagRef { .. }) = &mut *parent.data.borrow_mut() {
            node.insert_text(text);
            return;
        }

        if index > 0 {
            let previous = parent.children.borrow()[index - 1].clone();
            if let SinkData::Text(existing) = &mut *previous.data.borrow_mut() {
                existing.push_str(text);
                return;
            };
        }

        let node = self.retain(SinkNode::new(None, SinkData::Text(text.to_string()), None));
        self.set_parent(&node, parent);
        parent.children.borrow_mut().insert(index, node);
    }

    fn insert_at(&self, parent: &Handle, index: usize, child: NodeOrText<Handle>) {
        match child {
            NodeOrText::AppendText(text) => self.insert_text_at(parent, index, &text),
            NodeOrText::AppendNode(node) => {
                self.detach(&node);
                self.set_parent(&node, parent);
                parent.children.borrow_mut().insert(index, node);
            }
        }
    }

    /// The `html` element a fragment parse puts all content under.
    fn fragment_root(&self) -> Handle {
        self.document
            .children
            .borrow()
            .iter()
            .find(|child| child.is_named("html"))
            .cloned()
            .unwrap_or_else(|| self.document.clone())
    }
}

fn push_text(content: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text { text: last }) = content.last_mut() {
        last.push_str(text);
    } else {
        content.push(Node::text(text));
    }
}

fn fold(handle: &Handle, content: &mut Vec<Node>) {
    match &*handle.data.borrow() {
        SinkData::Text(text) => push_text(content, text),
        SinkData::Comment => {}
        SinkData::Document => {
            for child in handle.children.borrow().iter() {
                fold(child, content);
            }
        }
        SinkData::Element(node) => {
            let mut node = node.clone();
            // A reference is text only, its payload was built by insert_text_at.
            // Images carry their content in `alt`.
            if !matches!(node.kind(), NodeKind::TagRef | NodeKind::Image) {
                if let Some(children) = node.children_mut() {
                    let source = handle.template_contents.as_ref().unwrap_or(handle);
                    for child in source.children.borrow().iter() {
                        fold(child, children);
                    }
                }
            }
            content.push(node);
        }
    }
}

impl<A: TreeAdapter> TreeSink for AstSink<'_, A> {
    type Handle = Handle;
    type Output = Document;
    type ElemName<'b>
        = SinkElemName
    where
        Self: 'b;

    fn finish(self) -> Document {
        let mut content = Vec::new();
        for child in self.fragment_root().children.borrow().iter() {
            fold(child, &mut content);
        }
        Document::new(content)
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> Handle {
        self.document.clone()
    }

    fn elem_name<'b>(&'b self, target: &'b Handle) -> SinkElemName {
        let local = match &target.local {
            Some(local) => local.clone(),
            None => panic!("elem_name called on a non-element node"),
        };
        let ns = self
            .namespaces
            .borrow()
            .get(&id(target))
            .cloned()
            .unwrap_or(ns!(html));
        SinkElemName { ns, local }
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, flags: ElementFlags) -> Handle {
        let attrs: Vec<(String, String)> = attrs
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        let kind = self.adapter.node_kind(&name.local);
        let node = self.adapter.build_node(kind, &name.local, &attrs);

        let template_contents = flags
            .template
            .then(|| self.retain(SinkNode::new(None, SinkData::Document, None)));
        let handle = self.retain(SinkNode::new(
            Some(name.local.clone()),
            SinkData::Element(node),
            template_contents,
        ));
        self.namespaces.borrow_mut().insert(id(&handle), name.ns);
        handle
    }

    fn create_comment(&self, _text: StrTendril) -> Handle {
        self.retain(SinkNode::new(None, SinkData::Comment, None))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Handle {
        self.retain(SinkNode::new(None, SinkData::Comment, None))
    }

    fn append(&self, parent: &Handle, child: NodeOrText<Handle>) {
        let index = parent.children.borrow().len();
        self.insert_at(parent, index, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Handle,
        prev_element: &Handle,
        child: NodeOrText<Handle>,
    ) {
        if self.parent_of(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &Handle) -> Handle {
        match &target.template_contents {
            Some(contents) => contents.clone(),
            None => panic!("{:?} is not a template element", target.local),
        }
    }

    fn same_node(&self, x: &Handle, y: &Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Handle, new_node: NodeOrText<Handle>) {
        let parent = match self.parent_of(sibling) {
            Some(parent) => parent,
            None => panic!("append_before_sibling on a detached node"),
        };
        if let NodeOrText::AppendNode(node) = &new_node {
            self.detach(node);
        }
        let index = parent
            .children
            .borrow()
            .iter()
            .position(|child| Rc::ptr_eq(child, sibling))
            .unwrap_or(0);
        self.insert_at(&parent, index, new_node);
    }

    fn add_attrs_if_missing(&self, target: &Handle, attrs: Vec<Attribute>) {
        if let SinkData::Element(Node::Element { attrs: existing, .. }) =
            &mut *target.data.borrow_mut()
        {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if !existing.iter().any(|(k, _)| *k == key) {
                    existing.push((key, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Handle) {
        self.detach(target);
    }

    fn reparent_children(&self, node: &Handle, new_parent: &Handle) {
        let children: Vec<Handle> = node.children.borrow_mut().drain(..).collect();
        for child in children {
            self.set_parent(&child, new_parent);
            new_parent.children.borrow_mut().push(child);
        }
    }
}

/// Parse an HTML fragment into a document through `adapter`.
pub fn parse_html<A: TreeAdapter>(source: &str, adapter: &A) -> Document {
    parse_fragment(
        AstSink::new(adapter),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
        false,
    )
    .one(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::html::HtmlAdapter;
    use tagdb_parser::Nsfw;

    fn parse(source: &str) -> Vec<Node> {
        parse_html(source, &HtmlAdapter).content
    }

    #[test]
    fn test_text_and_br() {
        assert_eq!(
            parse("a<br>b"),
            vec![Node::text("a"), Node::br(), Node::text("b")]
        );
    }

    #[test]
    fn test_entities_merge_into_one_text_node() {
        assert_eq!(parse("a &amp; b &lt; c"), vec![Node::text("a & b < c")]);
    }

    #[test]
    fn test_tagref_text_concatenates() {
        assert_eq!(
            parse("<abbr title=\"x\">artist:john <b>x</b>doe</abbr>"),
            vec![Node::tagref("artist:john doe")]
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(
            parse(r#"<img src="https://e/x.jpg" alt="cover" nsfw="R18G">"#),
            vec![Node::image(
                "https://e/x.jpg",
                None,
                Some(Nsfw::R18G),
                vec![Node::text("cover")]
            )]
        );
    }

    #[test]
    fn test_misnested_markup_is_repaired() {
        assert_eq!(
            parse("<b>x<i>y</b>z</i>"),
            vec![
                Node::strong(vec![
                    Node::text("x"),
                    Node::emphasis(vec![Node::text("y")])
                ]),
                Node::emphasis(vec![Node::text("z")]),
            ]
        );
    }

    #[test]
    fn test_unknown_elements_are_kept() {
        let mut span = Node::element("span", vec![("class".into(), "x".into())]);
        span.append(Node::text("y"));
        assert_eq!(parse(r#"<span class="x">y</span>"#), vec![span]);
    }

    #[test]
    fn test_leading_whitespace_is_kept() {
        assert_eq!(
            parse("  a <strong>b</strong>"),
            vec![Node::text("  a "), Node::strong(vec![Node::text("b")])]
        );
    }

    #[test]
    fn test_head_elements_stay_in_place() {
        let mut title = Node::element("title", Vec::new());
        title.append(Node::text("t"));
        assert_eq!(
            parse("<title>t</title><p>x</p>"),
            vec![title, Node::paragraph(vec![Node::text("x")])]
        );
    }

    #[test]
    fn test_template_contents_become_children() {
        let mut template = Node::element("template", Vec::new());
        template.append(Node::text("x"));
        assert_eq!(
            parse("<template>x</template>y"),
            vec![template, Node::text("y")]
        );
    }

    #[test]
    #[should_panic(expected = "not a template")]
    fn test_template_contents_of_plain_element_panics() {
        let adapter = HtmlAdapter;
        let sink = AstSink::new(&adapter);
        let p = sink.create_element(
            QualName::new(None, ns!(html), LocalName::from("p")),
            Vec::new(),
            ElementFlags::default(),
        );
        sink.get_template_contents(&p);
    }

    #[test]
    fn test_detach_clears_parent_link() {
        let adapter = HtmlAdapter;
        let sink = AstSink::new(&adapter);
        let doc = sink.get_document();
        let p = sink.create_element(
            QualName::new(None, ns!(html), LocalName::from("p")),
            Vec::new(),
            ElementFlags::default(),
        );
        sink.append(&doc, NodeOrText::AppendNode(p.clone()));
        assert!(sink.parent_of(&p).is_some());

        sink.remove_from_parent(&p);
        assert!(sink.parent_of(&p).is_none());
        assert!(doc.children.borrow().is_empty());
    }

    #[test]
    fn test_text_appended_into_tagref_handle() {
        let adapter = HtmlAdapter;
        let sink = AstSink::new(&adapter);
        let abbr = sink.create_element(
            QualName::new(None, ns!(html), LocalName::from("abbr")),
            Vec::new(),
            ElementFlags::default(),
        );
        sink.append(&abbr, NodeOrText::AppendText("artist:".into()));
        sink.append(&abbr, NodeOrText::AppendText("john".into()));
        assert!(abbr.children.borrow().is_empty());
        assert!(matches!(
            &*abbr.data.borrow(),
            SinkData::Element(Node::TagRef { text }) if text == "artist:john"
        ));
    }
}
