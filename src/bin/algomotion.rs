use std::collections::VecDeque;

use clap::{Parser, Subcommand};

use algomotion::{Engine, Frame, NodeSource, StyleConfig, TickSource};

#[derive(Parser, Debug)]
#[command(name = "algomotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Pretty-print the frame JSON.
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate a breadth-first search, coloring nodes by BFS layer.
    BfsLayers,
    /// Animate a connected-components sweep, one color per component.
    Components,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let frames = match cli.cmd {
        Command::BfsLayers => bfs_layers()?,
        Command::Components => components()?,
    };
    let json = if cli.pretty {
        serde_json::to_string_pretty(&frames)?
    } else {
        serde_json::to_string(&frames)?
    };
    println!("{json}");
    Ok(())
}

// A small fixed graph with one odd-one-out vertex, enough to show layers
// and a second component.
const EDGES: &[(&str, &str)] = &[
    ("a", "b"),
    ("a", "c"),
    ("b", "d"),
    ("c", "d"),
    ("d", "e"),
    ("f", "g"),
];

fn bfs_layers() -> anyhow::Result<Vec<Frame>> {
    let mut engine = Engine::new();
    let g = engine.add_graph();
    for (u, v) in EDGES {
        engine.graph_mut(g).add_edge(*u, *v);
    }

    engine.color_nodes_by(g, NodeSource::prop("layer"), StyleConfig::None, None)?;
    engine.label_nodes_by(g, NodeSource::prop("layer"), StyleConfig::None)?;

    let mut queue = VecDeque::from([("a".to_string(), 0i64)]);
    let mut line = 1;
    while let Some((node, layer)) = queue.pop_front() {
        if engine.graph(g).node_attr(&node, "layer").is_some() {
            continue;
        }
        engine.graph_mut(g).set_node_attr(node.clone(), "layer", layer);
        engine.print(&format!("visit {node} at layer {layer}"));
        for next in engine.graph(g).neighbors(&node) {
            queue.push_back((next, layer + 1));
        }
        engine.trace_line(line);
        line += 1;
    }

    Ok(engine.build_frames()?)
}

fn components() -> anyhow::Result<Vec<Frame>> {
    let mut engine = Engine::new();
    let g = engine.add_graph();
    for (u, v) in EDGES {
        engine.graph_mut(g).add_edge(*u, *v);
    }

    engine.color_nodes_by(g, NodeSource::prop("component"), StyleConfig::None, None)?;

    let roots: Vec<String> = engine.graph(g).node_ids().cloned().collect();
    let mut component = 0i64;
    let mut line = 1;
    for root in roots {
        if engine.graph(g).node_attr(&root, "component").is_some() {
            continue;
        }
        engine.print(&format!("component {component} starts at {root}"));
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if engine.graph(g).node_attr(&node, "component").is_some() {
                continue;
            }
            engine
                .graph_mut(g)
                .set_node_attr(node.clone(), "component", component);
            stack.extend(engine.graph(g).neighbors(&node));
            engine.trace_line(line);
            line += 1;
        }
        component += 1;
    }

    engine.tick(TickSource::User);
    Ok(engine.build_frames()?)
}
