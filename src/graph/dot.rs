//! Graphviz rendering of a content graph, for debugging lowered schemas.

use std::fmt::Write;

use super::ContentGraph;
use super::node::{GraphLinkId, GraphNodeId};

/// Render the graph reachable from the root as a `digraph`.
///
/// Nodes are boxes, links are ellipses labelled `property: name` (or
/// `GraphLink` for groupings), attributes are eggs.
pub fn to_dot(graph: &ContentGraph) -> String {
    let mut out = String::new();
    let Some(root) = graph.root() else {
        out.push_str("digraph \"empty\" {\n}\n");
        return out;
    };
    let root_node = graph.node(root);
    let _ = writeln!(out, "digraph \"{}\" {{", escape(&root_node.name));

    let mut done_nodes = vec![false; graph.node_count()];
    let mut done_links = vec![false; graph.link_count()];
    write_node(graph, root, &mut out, &mut done_nodes, &mut done_links);

    out.push_str("}\n");
    out
}

fn write_node(
    graph: &ContentGraph,
    id: GraphNodeId,
    out: &mut String,
    done_nodes: &mut [bool],
    done_links: &mut [bool],
) {
    if std::mem::replace(&mut done_nodes[id.index()], true) {
        return;
    }
    let node = graph.node(id);
    let mut label = escape(&node.name);
    if let Some(java_type) = &node.java_type {
        let _ = write!(label, ":{java_type}");
    }
    let _ = writeln!(out, "\t\"n{}\" [label=\"{label}\", shape=box];", id.index());

    for (i, attr) in node.attributes.iter().enumerate() {
        let _ = writeln!(
            out,
            "\t\"n{}a{i}\" [label=\"{}{}\", shape=egg];",
            id.index(),
            escape(&attr.name),
            attr.instance.suffix()
        );
        let _ = writeln!(
            out,
            "\t\"n{0}\" -> \"n{0}a{i}\" [label=\"attribute\", color=magenta];",
            id.index()
        );
    }
    if let Some(extension) = node.extension {
        let _ = writeln!(
            out,
            "\t\"n{}\" -> \"n{}\" [label=\"extends\", color=red];",
            id.index(),
            extension.index()
        );
        write_node(graph, extension, out, done_nodes, done_links);
    }
    for &link in &node.links {
        let _ = writeln!(
            out,
            "\t\"n{}\" -> \"l{}\" [label=\"has\", color=purple];",
            id.index(),
            link.index()
        );
        write_link(graph, link, out, done_nodes, done_links);
    }
}

fn write_link(
    graph: &ContentGraph,
    id: GraphLinkId,
    out: &mut String,
    done_nodes: &mut [bool],
    done_links: &mut [bool],
) {
    if std::mem::replace(&mut done_links[id.index()], true) {
        return;
    }
    let link = graph.link(id);
    let label = match &link.name {
        Some(name) => format!("property: {}{}", escape(name), link.element_instance.suffix()),
        None if link.sequence_or => format!("GraphLink |{}", link.group_instance.suffix()),
        None => format!("GraphLink{}", link.group_instance.suffix()),
    };
    let _ = writeln!(out, "\t\"l{}\" [label=\"{label}\"];", id.index());

    if let Some(element) = link.element {
        let _ = writeln!(
            out,
            "\t\"l{}\" -> \"n{}\" [label=\"type of property\", color=darkgreen];",
            id.index(),
            element.index()
        );
        write_node(graph, element, out, done_nodes, done_links);
    }
    for &child in &link.children {
        let _ = writeln!(
            out,
            "\t\"l{}\" -> \"l{}\" [label=child, color=blue];",
            id.index(),
            child.index()
        );
        write_link(graph, child, out, done_nodes, done_links);
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
