use crate::block::{Block, BlockId, BlockKind};
use crate::config::{Config, MissingInstrument};
use crate::index::BlockIndex;
use crate::metadata;
use crate::names::display_name;
use std::collections::HashSet;

const PIPE: &str = "│   ";
const BRANCH: &str = "├── ";

/// Depth the root block is rendered at.
pub const ROOT_DEPTH: usize = 1;

/// Tree-drawing prefix for a line at `depth`. Clamp children carry their
/// parent's verticals plus a `│   ├── ` segment; sequential blocks carry
/// `depth` verticals and a branch.
pub fn prefix(depth: usize, clamp: bool) -> String {
    if clamp {
        format!("{}{}{}", PIPE.repeat(depth.saturating_sub(1)), PIPE, BRANCH)
    } else {
        format!("{}{}", PIPE.repeat(depth), BRANCH)
    }
}

#[derive(Clone, Copy)]
struct Frame<'a> {
    block: &'a Block,
    depth: usize,
    clamp: bool,
}

/// Depth-first renderer over a block graph. Each block is rendered at most
/// once per walker, at its first visit in pre-order.
pub struct Walker<'a> {
    index: &'a BlockIndex,
    config: &'a Config,
    visited: HashSet<BlockId>,
}

impl<'a> Walker<'a> {
    pub fn new(index: &'a BlockIndex, config: &'a Config) -> Self {
        Walker {
            index,
            config,
            visited: HashSet::new(),
        }
    }

    pub fn walk(mut self, root: &'a Block) -> Vec<String> {
        let index = self.index;
        let mut lines: Vec<String> = Vec::new();
        let mut stack = vec![Frame {
            block: root,
            depth: ROOT_DEPTH,
            clamp: false,
        }];

        while let Some(frame) = stack.pop() {
            let block = frame.block;
            if !self.visited.insert(block.id.clone()) {
                continue;
            }

            // Children are pushed in reverse so they pop in connection order.
            let mut children: Vec<Frame<'a>> = Vec::new();

            if block.kind.is_transparent() {
                let spliced = block.connections().filter_map(|id| index.get(id));
                children.extend(spliced.map(|child| Frame {
                    block: child,
                    ..frame
                }));
                stack.extend(children.into_iter().rev());
                continue;
            }

            if block.kind.is_suppressed() {
                log::trace!(
                    "dropping {} block {} at position {}",
                    block.tag,
                    block.id,
                    block.position
                );
                continue;
            }

            if let Some(line) = self.render(&frame) {
                lines.push(line);
            }

            for child in block.clamps.iter().filter_map(|id| index.resolve(id.as_ref())) {
                if block.kind == BlockKind::SetTimbre && child.kind == BlockKind::VoiceName {
                    continue;
                }
                children.push(Frame {
                    block: child,
                    depth: frame.depth + 1,
                    clamp: true,
                });
            }
            if let Some(child) = index.resolve(block.next.as_ref()) {
                children.push(Frame {
                    block: child,
                    depth: frame.depth,
                    clamp: false,
                });
            }
            stack.extend(children.into_iter().rev());
        }

        log::debug!("rendered {} of {} visited blocks", lines.len(), self.visited.len());
        lines
    }

    fn render(&self, frame: &Frame<'_>) -> Option<String> {
        let block = frame.block;
        let name = match display_name(block, self.index) {
            Some(name) => name,
            None => match self.config.missing_instrument {
                MissingInstrument::Fallback => "Set Instrument → Unknown".to_string(),
                MissingInstrument::Omit => {
                    log::debug!(
                        "omitting {} block {} at position {}: no instrument",
                        block.tag,
                        block.id,
                        block.position
                    );
                    return None;
                }
            },
        };

        let name = if block.kind == BlockKind::Start {
            let meta = metadata::extract(&block.payload, &self.config.metadata_keys);
            format!("{} → {{{}}}", name, meta)
        } else {
            name
        };

        Some(format!("{}{}", prefix(frame.depth, frame.clamp), name))
    }
}
