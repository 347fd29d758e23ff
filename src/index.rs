use crate::block::{Block, BlockId};
use indexmap::IndexMap;

/// Id lookup over a project's blocks. Duplicate ids keep the last block;
/// connections to unknown ids simply resolve to nothing.
#[derive(Debug, Default)]
pub struct BlockIndex {
    blocks: IndexMap<BlockId, Block>,
}

impl BlockIndex {
    pub fn build(blocks: impl IntoIterator<Item = Block>) -> Self {
        let mut map: IndexMap<BlockId, Block> = IndexMap::new();
        for block in blocks {
            map.insert(block.id.clone(), block);
        }
        BlockIndex { blocks: map }
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn resolve(&self, id: Option<&BlockId>) -> Option<&Block> {
        id.and_then(|id| self.get(id))
    }
}
