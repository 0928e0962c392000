//! Name → constructor registry for diagnostics.

use std::sync::Arc;

use indexmap::IndexMap;
use stratus_core::{Communicator, ParameterList};
use stratus_exec::ExecSpace;

use crate::diagnostic::Diagnostic;
use crate::error::DiagnosticError;
use crate::kernel::{DiagnosticKernel, KernelDiagnostic};

/// Builds a diagnostic from a communicator, parameters and the execution
/// space its kernels launch on.
pub type DiagnosticCreator = fn(
    &dyn Communicator,
    &ParameterList,
    &Arc<ExecSpace>,
) -> Result<Box<dyn Diagnostic>, DiagnosticError>;

/// [`DiagnosticCreator`] for any [`DiagnosticKernel`].
///
/// ```
/// # use stratus_diagnostic::{create_kernel_diagnostic, DiagnosticFactory};
/// # fn register<K: stratus_diagnostic::DiagnosticKernel>(f: &mut DiagnosticFactory) {
/// f.register("MyDiag", create_kernel_diagnostic::<K>);
/// # }
/// ```
pub fn create_kernel_diagnostic<K: DiagnosticKernel>(
    comm: &dyn Communicator,
    params: &ParameterList,
    exec: &Arc<ExecSpace>,
) -> Result<Box<dyn Diagnostic>, DiagnosticError> {
    let kernel = K::from_params(comm, params)?;
    Ok(Box::new(KernelDiagnostic::new(
        kernel,
        params,
        Arc::clone(exec),
    )?))
}

/// Registry of diagnostic constructors.
///
/// Populate it once at startup, then share it read-only. Diagnostics it
/// creates launch their kernels on the factory's [`ExecSpace`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stratus_core::{ParameterList, SerialComm};
/// use stratus_diagnostic::{DiagnosticError, DiagnosticFactory};
/// use stratus_exec::{ExecConfig, ExecSpace};
///
/// let exec = Arc::new(ExecSpace::new(ExecConfig::serial()).unwrap());
/// let factory = DiagnosticFactory::new(exec);
/// let err = factory
///     .create("NoSuchThing", &SerialComm, &ParameterList::default())
///     .err()
///     .unwrap();
/// assert!(matches!(err, DiagnosticError::UnknownDiagnostic { .. }));
/// ```
pub struct DiagnosticFactory {
    creators: IndexMap<String, DiagnosticCreator>,
    exec: Arc<ExecSpace>,
}

impl DiagnosticFactory {
    /// Empty registry whose diagnostics run on `exec`.
    pub fn new(exec: Arc<ExecSpace>) -> Self {
        Self {
            creators: IndexMap::new(),
            exec,
        }
    }

    /// The execution space handed to created diagnostics.
    pub fn exec_space(&self) -> &Arc<ExecSpace> {
        &self.exec
    }

    /// Register `creator` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, creator: DiagnosticCreator) {
        let name = name.into();
        if self.creators.insert(name.clone(), creator).is_some() {
            log::warn!("diagnostic '{name}' re-registered; previous constructor replaced");
        }
    }

    /// Build the diagnostic registered as `name`.
    pub fn create(
        &self,
        name: &str,
        comm: &dyn Communicator,
        params: &ParameterList,
    ) -> Result<Box<dyn Diagnostic>, DiagnosticError> {
        let creator = self
            .creators
            .get(name)
            .ok_or_else(|| DiagnosticError::UnknownDiagnostic {
                name: name.to_string(),
                available: self.names(),
            })?;
        log::debug!("creating diagnostic '{name}'");
        creator(comm, params, &self.exec)
    }

    /// Whether `name` has a constructor.
    pub fn is_registered(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.creators.keys().cloned().collect()
    }
}

impl std::fmt::Debug for DiagnosticFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticFactory")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_core::{FieldIdentifier, SerialComm};
    use stratus_exec::ExecConfig;
    use stratus_grid::Grid;

    use crate::context::ComputeContext;
    use crate::request::FieldRequest;

    struct Named(&'static str);

    impl DiagnosticKernel for Named {
        fn from_params(_: &dyn Communicator, p: &ParameterList) -> Result<Self, DiagnosticError> {
            Ok(Named(if p.get_or("second", false)? {
                "second"
            } else {
                "first"
            }))
        }

        fn name(&self) -> &str {
            self.0
        }

        fn bind_grid(&mut self, _: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError> {
            Ok(Vec::new())
        }

        fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
            Err(DiagnosticError::GridsNotSet {
                diagnostic: self.0.into(),
            })
        }

        fn compute(&self, _: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
            Ok(())
        }
    }

    struct Other;

    impl DiagnosticKernel for Other {
        fn from_params(_: &dyn Communicator, _: &ParameterList) -> Result<Self, DiagnosticError> {
            Ok(Other)
        }

        fn name(&self) -> &str {
            "other"
        }

        fn bind_grid(&mut self, _: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError> {
            Ok(Vec::new())
        }

        fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
            Err(DiagnosticError::GridsNotSet {
                diagnostic: "other".into(),
            })
        }

        fn compute(&self, _: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
            Ok(())
        }
    }

    fn factory() -> DiagnosticFactory {
        DiagnosticFactory::new(Arc::new(ExecSpace::new(ExecConfig::serial()).unwrap()))
    }

    #[test]
    fn unknown_name_lists_registered() {
        let mut f = factory();
        f.register("Named", create_kernel_diagnostic::<Named>);
        let err = f
            .create("Missing", &SerialComm, &ParameterList::default())
            .err()
            .unwrap();
        assert_eq!(
            err,
            DiagnosticError::UnknownDiagnostic {
                name: "Missing".into(),
                available: vec!["Named".into()],
            }
        );
    }

    #[test]
    fn params_reach_the_kernel() {
        let mut f = factory();
        f.register("Named", create_kernel_diagnostic::<Named>);
        let mut p = ParameterList::default();
        p.set("second", true);
        let d = f.create("Named", &SerialComm, &p).unwrap();
        assert_eq!(d.name(), "second");
    }

    #[test]
    fn bad_params_propagate() {
        let mut f = factory();
        f.register("Named", create_kernel_diagnostic::<Named>);
        let mut p = ParameterList::default();
        p.set("second", "yes");
        assert!(matches!(
            f.create("Named", &SerialComm, &p).err(),
            Some(DiagnosticError::Parameter(_))
        ));
    }

    #[test]
    fn reregistration_overwrites() {
        let mut f = factory();
        f.register("D", create_kernel_diagnostic::<Named>);
        f.register("D", create_kernel_diagnostic::<Other>);
        assert_eq!(f.names(), vec!["D".to_string()]);
        assert!(f.is_registered("D"));
        assert!(!f.is_registered("E"));
        let d = f.create("D", &SerialComm, &ParameterList::default()).unwrap();
        assert_eq!(d.name(), "other");
    }
}
