//! Colors for the external renderer
//!
//! [`Palette::paint`] turns the current emphasis into a full color assignment:
//! every node and link starts from its default color and only the emphasized
//! neighborhood is overridden, so a repaint never depends on what was painted
//! before.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::graph::Graph;
use crate::interaction::events::Emphasis;

/// 24-bit color, written `#rrggbb` in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u32);

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .unwrap_or(s);
        if hex.len() != 6 {
            return Err(format!("expected #rrggbb, got {s:?}"));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|e| format!("bad color {s:?}: {e}"))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Gradient endpoints of one link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkColors {
    pub from: Rgb,
    pub to: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub node: Rgb,
    pub node_hover: Rgb,
    pub node_connection: Rgb,
    pub link_from: Rgb,
    pub link_to: Rgb,
    pub link_connection_from: Rgb,
    pub link_connection_to: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            node: Rgb(0xc6492c),
            node_hover: Rgb(0xffe213),
            node_connection: Rgb(0xaab172),
            link_from: Rgb(0x732196),
            link_to: Rgb(0xc6492c),
            link_connection_from: Rgb(0xffffff),
            link_connection_to: Rgb(0xffe213),
        }
    }
}

/// One color per node and one gradient per link, indexed like the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub nodes: Vec<Rgb>,
    pub links: Vec<LinkColors>,
}

impl Palette {
    pub fn paint<I, D>(&self, graph: &Graph<I, D>, emphasis: Option<&Emphasis>) -> Paint {
        let mut nodes = vec![self.node; graph.node_count()];
        let mut links = vec![
            LinkColors {
                from: self.link_from,
                to: self.link_to,
            };
            graph.link_count()
        ];

        if let Some(emphasis) = emphasis {
            for neighbor in &emphasis.neighbors {
                if let Some(color) = nodes.get_mut(neighbor.0) {
                    *color = self.node_connection;
                }
            }
            if let Some(color) = nodes.get_mut(emphasis.node.0) {
                *color = self.node_hover;
            }
            for link in &emphasis.links {
                if let Some(colors) = links.get_mut(link.0) {
                    *colors = LinkColors {
                        from: self.link_connection_from,
                        to: self.link_connection_to,
                    };
                }
            }
        }

        Paint { nodes, links }
    }
}
