use anyhow::Result;

use super::CommandContext;
use crate::producer::AnnexOp;
use crate::ui::Terminal;

impl<T: Terminal> CommandContext<T> {
    /// Lock everything, merge remote changes, and optionally fetch content
    /// for the whole repository.
    pub async fn download(&mut self, content: bool) -> Result<()> {
        let root = self.require_repo().await?;
        self.pass(AnnexOp::Lock, Vec::new(), 0).await?;

        let remote = self.config.remote.clone();
        self.step("Downloading changes", self.git.sync_changes(&remote))
            .await?;

        if content {
            self.git = self.git.clone().in_dir(root);
            self.get_content(Vec::new()).await?;
        }
        Ok(())
    }
}
