//! AST for the rich inline content of tag records
//!
//!     Every field of a record (name, intro, links) is a [Document]: an ordered list of
//!     sibling [Node]s. There is no document element of its own, a document is the
//!     implicit root fragment that serializers wrap in whatever their dialect needs.
//!
//! Containers and Leaves
//!
//!     The node kinds share no behavior except "does it have children", so they are one
//!     closed enum and callers ask capability questions ([Node::children],
//!     [Node::is_container], [Node::text_payload]) rather than comparing kinds. The answer to
//!     "container or leaf" is fixed per kind:
//!
//!     | Kind      | Container | Payload                         |
//!     |-----------|-----------|---------------------------------|
//!     | text      | no        | the text                        |
//!     | br        | no        |                                 |
//!     | tagref    | no        | the reference text as typed     |
//!     | paragraph | yes       |                                 |
//!     | strong    | yes       |                                 |
//!     | emphasis  | yes       |                                 |
//!     | link      | yes       | url, title                      |
//!     | image     | yes       | url, title, nsfw; children = alt|
//!     | element   | yes       | name, raw attributes            |
//!
//!     `element` is where markup the AST doesn't model ends up, with its attributes kept
//!     as they were found.
//!
//!     Adjacent text nodes are never merged by the AST itself. Whoever builds the tree
//!     decides (the inline parser and the html sink both merge).

mod document;
mod node;
mod tagref;

pub use document::Document;
pub use node::{Node, NodeKind, Nsfw};
pub use tagref::{ResolvedTagRef, TagRefResolver, UnresolvedTags};
