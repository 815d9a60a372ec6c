//! libgit2 implementation of the git capability.
//!
//! [`Git2Backend`] wraps the `git2` library behind the [`GitBackend`] trait. It
//! only remembers the working directory: each call opens the repository on
//! tokio's blocking pool, does its work and drops the handle, so the async side
//! never holds a `Repository` across an await point.
//!
//! # Key Features
//! - **Status matrix**: HEAD/workdir/index comparison by blob id for every known path
//! - **Staging**: Add or remove index entries, restore entries from HEAD
//! - **Commits**: Write the index as a tree and commit on the current branch
//! - **Sync**: Token-authenticated push and fast-forward-only pull

use crate::core::{
    backend::{GitBackend, RemoteAuth},
    config::Author,
    error::{NoteGitError, Result},
    status_matrix::{HeadState, StageState, StatusMatrixEntry, WorkTreeState},
};
use git2::{
    build::CheckoutBuilder, Commit, Cred, DiffOptions, ErrorCode, FetchOptions, ObjectType, Oid,
    PushOptions, RemoteCallbacks, Repository, RepositoryInitOptions, Signature, Status,
    StatusOptions, TreeWalkMode, TreeWalkResult,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

const INDEX_STAGE_MASK: u16 = 0x3000;
const TOKEN_PASSWORD: &str = "x-oauth-basic";

#[derive(Debug, Clone)]
pub struct Git2Backend {
    workdir: PathBuf,
}

impl Git2Backend {
    /// Open the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path.as_ref())
            .map_err(|_| NoteGitError::not_in_git_repo(path.as_ref()))?;
        Self::from_repository(&repo)
    }

    /// Open the repository at `path`, initializing one on `main` if there is none
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Ok(repo) = Repository::open(path.as_ref()) {
            log::debug!("Repository already exists at {}", path.as_ref().display());
            return Self::from_repository(&repo);
        }

        log::info!("Initializing repository at {}", path.as_ref().display());
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(path.as_ref(), &opts)?;
        Self::from_repository(&repo)
    }

    fn from_repository(repo: &Repository) -> Result<Self> {
        let workdir = repo.workdir().ok_or(NoteGitError::BareRepository)?;
        Ok(Self {
            workdir: workdir.to_path_buf(),
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run `task` against a freshly opened repository on the blocking pool
    async fn run_blocking<T, F>(&self, task: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Repository) -> Result<T> + Send + 'static,
    {
        let workdir = self.workdir.clone();
        tokio::task::spawn_blocking(move || {
            let repo = Repository::open(&workdir)?;
            task(&repo)
        })
        .await?
    }
}

#[async_trait::async_trait]
impl GitBackend for Git2Backend {
    async fn status_matrix(&self) -> Result<Vec<StatusMatrixEntry>> {
        self.run_blocking(read_status_matrix).await
    }

    async fn stage(&self, filename: &str) -> Result<()> {
        let filename = filename.to_string();
        self.run_blocking(move |repo| stage_path(repo, &filename))
            .await
    }

    async fn unstage(&self, filename: &str) -> Result<()> {
        let filename = filename.to_string();
        self.run_blocking(move |repo| unstage_path(repo, &filename))
            .await
    }

    async fn commit(&self, message: &str, author: &Author) -> Result<String> {
        let message = message.to_string();
        let author = author.clone();
        self.run_blocking(move |repo| commit_index(repo, &message, &author))
            .await
    }

    async fn push(&self, remote: &RemoteAuth) -> Result<()> {
        let remote = remote.clone();
        self.run_blocking(move |repo| push_branch(repo, &remote))
            .await
    }

    async fn pull(&self, remote: &RemoteAuth) -> Result<()> {
        let remote = remote.clone();
        self.run_blocking(move |repo| pull_branch(repo, &remote))
            .await
    }
}

fn head_commit(repo: &Repository) -> Result<Option<Commit<'_>>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?)),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn head_blobs(repo: &Repository) -> Result<BTreeMap<String, Oid>> {
    let mut blobs = BTreeMap::new();
    let Some(commit) = head_commit(repo)? else {
        return Ok(blobs);
    };

    commit.tree()?.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(ObjectType::Blob) {
            if let Some(name) = entry.name() {
                blobs.insert(format!("{root}{name}"), entry.id());
            }
        }
        TreeWalkResult::Ok
    })?;

    Ok(blobs)
}

fn index_blobs(repo: &Repository) -> Result<BTreeMap<String, Oid>> {
    let index = repo.index()?;
    let mut blobs = BTreeMap::new();

    for entry in index.iter() {
        // conflict stages are left to the user
        if entry.flags & INDEX_STAGE_MASK != 0 {
            continue;
        }
        let path = String::from_utf8(entry.path).map_err(|_| NoteGitError::InvalidUtf8Path)?;
        blobs.insert(path, entry.id);
    }

    Ok(blobs)
}

/// Working-tree view from libgit2's status scan, which runs files through
/// the checkin filters (`core.autocrlf`, `.gitattributes`)
#[derive(Default)]
struct WorkdirScan {
    untracked: Vec<String>,
    /// Paths whose working copy differs from the index entry
    unlike_index: BTreeSet<String>,
}

fn scan_workdir(repo: &Repository) -> Result<WorkdirScan> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);

    let statuses = repo.statuses(Some(&mut opts))?;
    let mut scan = WorkdirScan::default();
    for entry in statuses.iter() {
        let status = entry.status();
        let path = entry.path().ok_or(NoteGitError::InvalidUtf8Path)?;
        if status.contains(Status::WT_NEW) {
            scan.untracked.push(path.to_string());
        }
        if status.intersects(
            Status::WT_MODIFIED | Status::WT_DELETED | Status::WT_TYPECHANGE | Status::WT_RENAMED,
        ) {
            scan.unlike_index.insert(path.to_string());
        }
    }

    Ok(scan)
}

/// Paths whose working copy differs from HEAD, compared through the filters
fn changed_since_head(repo: &Repository) -> Result<BTreeSet<String>> {
    let tree = match head_commit(repo)? {
        Some(commit) => Some(commit.tree()?),
        None => None,
    };

    let mut opts = DiffOptions::new();
    opts.include_untracked(true).recurse_untracked_dirs(true);
    let diff = repo.diff_tree_to_workdir(tree.as_ref(), Some(&mut opts))?;

    let mut paths = BTreeSet::new();
    for delta in diff.deltas() {
        let path = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .and_then(Path::to_str)
            .ok_or(NoteGitError::InvalidUtf8Path)?;
        paths.insert(path.to_string());
    }

    Ok(paths)
}

fn head_state(head: Option<Oid>) -> HeadState {
    match head {
        Some(_) => HeadState::Present,
        None => HeadState::Absent,
    }
}

fn workdir_state(on_disk: bool, differs_from_head: bool) -> WorkTreeState {
    match (on_disk, differs_from_head) {
        (false, _) => WorkTreeState::Absent,
        (true, false) => WorkTreeState::Identical,
        (true, true) => WorkTreeState::Modified,
    }
}

fn stage_state(head: Option<Oid>, stage: Option<Oid>, matches_workdir: bool) -> StageState {
    match stage {
        None => StageState::Absent,
        Some(oid) if Some(oid) == head => StageState::Identical,
        Some(_) if matches_workdir => StageState::Modified,
        Some(_) => StageState::ModifiedAgain,
    }
}

fn read_status_matrix(repo: &Repository) -> Result<Vec<StatusMatrixEntry>> {
    let workdir = repo.workdir().ok_or(NoteGitError::BareRepository)?;
    let head = head_blobs(repo)?;
    let stage = index_blobs(repo)?;
    let scan = scan_workdir(repo)?;
    let changed = changed_since_head(repo)?;

    let mut paths: BTreeSet<String> = head.keys().cloned().collect();
    paths.extend(stage.keys().cloned());
    paths.extend(scan.untracked.iter().cloned());

    let mut matrix = Vec::with_capacity(paths.len());
    for path in paths {
        let head_oid = head.get(&path).copied();
        let stage_oid = stage.get(&path).copied();
        let on_disk = workdir.join(&path).is_file();
        let differs_from_head = head_oid.is_none() || changed.contains(&path);
        let matches_workdir = on_disk && !scan.unlike_index.contains(&path);

        matrix.push(StatusMatrixEntry::new(
            path,
            head_state(head_oid),
            workdir_state(on_disk, differs_from_head),
            stage_state(head_oid, stage_oid, matches_workdir),
        ));
    }

    log::debug!("Status matrix has {} entries", matrix.len());
    Ok(matrix)
}

fn stage_path(repo: &Repository, filename: &str) -> Result<()> {
    let workdir = repo.workdir().ok_or(NoteGitError::BareRepository)?;
    let path = Path::new(filename);
    let mut index = repo.index()?;

    if workdir.join(path).exists() {
        log::debug!("Staging {filename}");
        index.add_path(path)?;
    } else {
        log::debug!("Staging deletion of {filename}");
        index.remove_path(path)?;
    }

    index.write()?;
    Ok(())
}

fn unstage_path(repo: &Repository, filename: &str) -> Result<()> {
    match head_commit(repo)? {
        Some(commit) => {
            log::debug!("Resetting {filename} to HEAD");
            repo.reset_default(Some(commit.as_object()), [filename])?;
        }
        None => {
            log::debug!("Removing {filename} from index (no commits yet)");
            let mut index = repo.index()?;
            index.remove_path(Path::new(filename))?;
            index.write()?;
        }
    }

    Ok(())
}

fn commit_index(repo: &Repository, message: &str, author: &Author) -> Result<String> {
    let signature = Signature::now(&author.name, &author.email)?;
    let mut index = repo.index()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let parent = head_commit(repo)?;
    let parents: Vec<&Commit<'_>> = parent.iter().collect();

    let oid = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )?;

    log::debug!("Created commit {oid}");
    Ok(oid.to_string())
}

fn current_branch(repo: &Repository, action: &str) -> Result<String> {
    match repo.head() {
        Ok(head) if head.is_branch() => head
            .shorthand()
            .map(str::to_string)
            .ok_or(NoteGitError::InvalidUtf8Path),
        Ok(_) => Err(NoteGitError::detached_head(action)),
        Err(e) if e.code() == ErrorCode::UnbornBranch => {
            let head = repo.find_reference("HEAD")?;
            head.symbolic_target()
                .and_then(|target| target.strip_prefix("refs/heads/"))
                .map(str::to_string)
                .ok_or_else(|| NoteGitError::detached_head(action))
        }
        Err(e) => Err(e.into()),
    }
}

/// Callbacks answering credential requests with the token, once
fn token_callbacks<'a>(remote: &RemoteAuth) -> RemoteCallbacks<'a> {
    let token = remote.token.clone();
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, _username, _allowed| {
        attempts += 1;
        if attempts > 1 {
            return Err(git2::Error::from_str("remote rejected the configured token"));
        }
        Cred::userpass_plaintext(&token, TOKEN_PASSWORD)
    });
    callbacks
}

fn push_branch(repo: &Repository, remote_auth: &RemoteAuth) -> Result<()> {
    let branch = current_branch(repo, "push")?;
    let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
    let mut remote = repo.remote_anonymous(&remote_auth.url)?;
    let mut rejected: Option<(String, String)> = None;

    {
        let mut callbacks = token_callbacks(remote_auth);
        callbacks.push_update_reference(|reference, status| {
            if let Some(message) = status {
                rejected = Some((reference.to_string(), message.to_string()));
            }
            Ok(())
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);
        log::debug!("Pushing {refspec} to {}", remote_auth.url);
        remote.push(&[refspec.as_str()], Some(&mut options))?;
    }

    match rejected {
        Some((reference, message)) => Err(NoteGitError::push_rejected(reference, message)),
        None => Ok(()),
    }
}

fn pull_branch(repo: &Repository, remote_auth: &RemoteAuth) -> Result<()> {
    let branch = current_branch(repo, "pull")?;
    let refname = format!("refs/heads/{branch}");
    let mut remote = repo.remote_anonymous(&remote_auth.url)?;

    let mut options = FetchOptions::new();
    options.remote_callbacks(token_callbacks(remote_auth));
    log::debug!("Fetching {branch} from {}", remote_auth.url);
    remote.fetch(&[branch.as_str()], Some(&mut options), None)?;

    let fetch_head = repo.find_reference("FETCH_HEAD")?;
    let fetched = repo.reference_to_annotated_commit(&fetch_head)?;
    let (analysis, _) = repo.merge_analysis(&[&fetched])?;

    if analysis.is_up_to_date() {
        log::debug!("{branch} is already up to date");
        return Ok(());
    }
    if !analysis.is_unborn() && !analysis.is_fast_forward() {
        return Err(NoteGitError::non_fast_forward(branch));
    }

    // files first: a refused checkout must leave the branch where it was
    let target = repo.find_commit(fetched.id())?;
    let mut checkout = CheckoutBuilder::new();
    checkout.safe();
    repo.checkout_tree(target.as_object(), Some(&mut checkout))?;

    if analysis.is_unborn() {
        log::debug!("Creating {refname} at {}", target.id());
        repo.reference(&refname, target.id(), true, "notegit: pull")?;
    } else {
        log::debug!("Fast-forwarding {refname} to {}", target.id());
        repo.find_reference(&refname)?
            .set_target(target.id(), "notegit: fast-forward")?;
    }
    repo.set_head(&refname)?;
    Ok(())
}
