//! The per-unit handle passed to team kernels.

/// Identity of one outer unit and its team.
///
/// Lanes of a team run on the worker that owns the unit, in lane order,
/// so [`team_barrier`](Self::team_barrier) only has to order the calls
/// made before it against those made after it. Cross-unit communication
/// is not possible; units are independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeamMember {
    league_rank: usize,
    league_size: usize,
    team_size: usize,
}

impl TeamMember {
    pub(crate) fn new(league_rank: usize, league_size: usize, team_size: usize) -> Self {
        Self {
            league_rank,
            league_size,
            team_size,
        }
    }

    /// Index of this unit within the league.
    pub fn league_rank(&self) -> usize {
        self.league_rank
    }

    /// Number of units in the league.
    pub fn league_size(&self) -> usize {
        self.league_size
    }

    /// Lanes in this team.
    pub fn team_size(&self) -> usize {
        self.team_size
    }

    /// Run `f(i)` for every `i` in `0..n`, distributed across the lanes.
    ///
    /// Lane `l` handles `l, l + team_size, l + 2 * team_size, ...`.
    pub fn team_vector_range(&self, n: usize, mut f: impl FnMut(usize)) {
        for lane in 0..self.team_size {
            for i in (lane..n).step_by(self.team_size) {
                f(i);
            }
        }
    }

    /// Order all lane work issued before the call ahead of anything after it.
    ///
    /// Lanes of one team are executed serially on the worker that owns
    /// the unit, so this is a memory fence, not a rendezvous of
    /// concurrent threads. Writes made by any lane before the barrier are
    /// visible to every lane after it.
    pub fn team_barrier(&self) {
        std::sync::atomic::fence(std::sync::atomic::Ordering::SeqCst);
    }
}
