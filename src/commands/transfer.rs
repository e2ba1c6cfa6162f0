use anyhow::Result;

use super::CommandContext;
use crate::producer::AnnexOp;
use crate::ui::Terminal;

impl<T: Terminal> CommandContext<T> {
    pub async fn lock(&mut self, paths: Vec<String>) -> Result<()> {
        self.require_repo().await?;
        self.pass(AnnexOp::Lock, paths, 0).await?;
        Ok(())
    }

    pub async fn unlock(&mut self, paths: Vec<String>) -> Result<()> {
        self.require_repo().await?;
        self.pass(AnnexOp::Unlock, paths, 0).await?;
        Ok(())
    }

    /// Download content for `paths`, with a bar over the annexed files found.
    pub async fn get_content(&mut self, paths: Vec<String>) -> Result<()> {
        self.require_repo().await?;
        let nitems = self.count_files(&paths).await;
        self.pass(AnnexOp::Get, paths, nitems).await?;
        Ok(())
    }

    /// Lock, then drop local content that exists on a remote.
    pub async fn remove_content(&mut self, paths: Vec<String>) -> Result<()> {
        self.require_repo().await?;
        self.pass(AnnexOp::Lock, paths.clone(), 0).await?;
        self.pass(AnnexOp::RemoveContent, paths, 0).await?;
        Ok(())
    }

    /// Lock, push committed changes, then copy content to the remote.
    pub async fn upload(&mut self, paths: Vec<String>) -> Result<()> {
        self.require_repo().await?;
        self.pass(AnnexOp::Lock, paths.clone(), 0).await?;

        let remote = self.config.remote.clone();
        self.step("Uploading changes", self.git.push(&remote)).await?;

        let nitems = self.count_files(&paths).await;
        self.pass(AnnexOp::Upload, paths, nitems).await?;
        Ok(())
    }
}
