//! Pointwise `<COL,LEV>` kernels: one team per column, one lane per level.

use stratus_core::Real;
use stratus_diagnostic::{ComputeContext, DiagnosticError};
use stratus_exec::TeamPolicy;
use stratus_field::Device;

/// Set `out[i, k] = f([in_0[i, k], .., in_{N-1}[i, k]])` for every
/// logical column `i` and level `k`.
pub(crate) fn apply_columnwise<const N: usize>(
    ctx: &ComputeContext<'_>,
    label: &str,
    inputs: [&str; N],
    f: impl Fn([Real; N]) -> Real + Send + Sync,
) -> Result<(), DiagnosticError> {
    let mut views = Vec::with_capacity(N);
    for name in inputs {
        views.push(ctx.input(name)?.get_view::<Real, 2, Device>()?);
    }

    let output = ctx.output();
    let mut out = output.get_view_mut::<Real, 2, Device>()?;
    let [ncols, nlevs] = out.extents();
    if let Some((name, v)) = inputs
        .iter()
        .zip(&views)
        .find(|(_, v)| v.extents() != [ncols, nlevs])
    {
        return Err(ctx.failure(format!(
            "input '{name}' has extents {:?}, output has {:?}",
            v.extents(),
            [ncols, nlevs]
        )));
    }
    let strides: Vec<usize> = views.iter().map(|v| v.padded_extents()[1]).collect();
    let data: Vec<&[Real]> = views.iter().map(|v| v.as_slice()).collect();

    ctx.exec().team_parallel_for(
        label,
        TeamPolicy::default_for(ncols, nlevs),
        out.as_mut_slice(),
        |team, column| {
            let icol = team.league_rank();
            team.team_vector_range(nlevs, |k| {
                let args = std::array::from_fn(|j| data[j][icol * strides[j] + k]);
                column[k] = f(args);
            });
            team.team_barrier();
        },
    )?;
    Ok(())
}
