use crate::domain::Role;
use crate::session::{SessionState, SessionStore, SubscriptionId};

/// A role-gated region of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Area {
    Customer,
    CustomerAuth,
    Rider,
    RiderAuth,
}

impl Area {
    /// Route prefix the area is mounted at.
    pub fn path(&self) -> &'static str {
        match self {
            Area::Customer => "/customer",
            Area::CustomerAuth => "/customer/login",
            Area::Rider => "/rider",
            Area::RiderAuth => "/rider/login",
        }
    }
}

/// Outcome of evaluating the current session against a requested area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Area),
    /// Session still resolving; render a loading state, neither allow nor
    /// redirect yet.
    Pending,
    /// Session resolution failed; surface a retry, never treat as signed out.
    SessionError,
}

/// Pure access rule: maps (session state, requested area) to a decision.
///
/// Authenticated areas require a signed-in session with the matching role and
/// redirect to their login area otherwise; auth areas are only reachable
/// signed out and bounce a signed-in session back to its home area.
pub fn evaluate(state: &SessionState, area: Area) -> Decision {
    match state {
        SessionState::Resolving => Decision::Pending,
        SessionState::Unavailable(_) => Decision::SessionError,
        SessionState::SignedOut => match area {
            Area::Customer => Decision::Redirect(Area::CustomerAuth),
            Area::Rider => Decision::Redirect(Area::RiderAuth),
            Area::CustomerAuth | Area::RiderAuth => Decision::Allow,
        },
        SessionState::SignedIn(session) => match (area, session.role) {
            (Area::Customer, Role::Customer) | (Area::Rider, Role::Rider) => Decision::Allow,
            (Area::Customer, _) => Decision::Redirect(Area::CustomerAuth),
            (Area::Rider, _) => Decision::Redirect(Area::RiderAuth),
            (Area::CustomerAuth, _) => Decision::Redirect(Area::Customer),
            (Area::RiderAuth, _) => Decision::Redirect(Area::Rider),
        },
    }
}

/// Watches an area: evaluates against the current state immediately, then
/// re-evaluates on every session change, invoking `sink` synchronously each
/// time (including the initial `Resolving` → resolved transition).
///
/// Returns the subscription handle; pass it to
/// [`SessionStore::unsubscribe`] on teardown.
pub fn watch(
    store: &SessionStore,
    area: Area,
    sink: impl Fn(Decision) + Send + Sync + 'static,
) -> SubscriptionId {
    sink(evaluate(&store.current(), area));
    store.subscribe(move |state| sink(evaluate(state, area)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Session;
    use rstest::*;
    use speculoos::prelude::*;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    fn signed_in(role: Role) -> SessionState {
        SessionState::SignedIn(Session {
            user_id: Uuid::new_v4(),
            role,
            display_name: "T".to_string(),
            avatar_url: None,
        })
    }

    #[rstest]
    #[case(Area::Customer, Role::Customer, Decision::Allow)]
    #[case(Area::Rider, Role::Rider, Decision::Allow)]
    #[case(Area::Customer, Role::Rider, Decision::Redirect(Area::CustomerAuth))]
    #[case(Area::Rider, Role::Customer, Decision::Redirect(Area::RiderAuth))]
    #[case(Area::CustomerAuth, Role::Customer, Decision::Redirect(Area::Customer))]
    #[case(Area::CustomerAuth, Role::Rider, Decision::Redirect(Area::Customer))]
    #[case(Area::RiderAuth, Role::Rider, Decision::Redirect(Area::Rider))]
    #[case(Area::RiderAuth, Role::Customer, Decision::Redirect(Area::Rider))]
    fn test_signed_in_rules(
        #[case] area: Area,
        #[case] role: Role,
        #[case] expected: Decision,
    ) {
        assert_that!(evaluate(&signed_in(role), area)).is_equal_to(expected);
    }

    #[rstest]
    #[case(Area::Customer, Decision::Redirect(Area::CustomerAuth))]
    #[case(Area::Rider, Decision::Redirect(Area::RiderAuth))]
    #[case(Area::CustomerAuth, Decision::Allow)]
    #[case(Area::RiderAuth, Decision::Allow)]
    fn test_signed_out_rules(#[case] area: Area, #[case] expected: Decision) {
        assert_that!(evaluate(&SessionState::SignedOut, area)).is_equal_to(expected);
    }

    /// A failed session lookup is never conflated with "signed out".
    #[rstest]
    #[case(Area::Customer)]
    #[case(Area::CustomerAuth)]
    #[case(Area::Rider)]
    #[case(Area::RiderAuth)]
    fn test_unavailable_is_distinct(#[case] area: Area) {
        let state = SessionState::Unavailable("backend unreachable".to_string());
        assert_that!(evaluate(&state, area)).is_equal_to(Decision::SessionError);
    }

    #[rstest]
    #[case(Area::Customer)]
    #[case(Area::RiderAuth)]
    fn test_resolving_is_pending(#[case] area: Area) {
        assert_that!(evaluate(&SessionState::Resolving, area)).is_equal_to(Decision::Pending);
    }

    #[test]
    fn test_watch_re_evaluates_on_change() {
        let store = SessionStore::new();
        let decisions = Arc::new(Mutex::new(Vec::new()));
        let sink = decisions.clone();
        watch(&store, Area::Customer, move |decision| {
            sink.lock().unwrap().push(decision);
        });

        store.set(SessionState::SignedOut);
        store.set(signed_in(Role::Customer));

        let seen = decisions.lock().unwrap().clone();
        assert_that!(seen).is_equal_to(vec![
            // Initial evaluation against the unresolved store.
            Decision::Pending,
            Decision::Redirect(Area::CustomerAuth),
            Decision::Allow,
        ]);
    }

    #[test]
    fn test_watch_teardown() {
        let store = SessionStore::new();
        let decisions = Arc::new(Mutex::new(Vec::new()));
        let sink = decisions.clone();
        let id = watch(&store, Area::Rider, move |decision| {
            sink.lock().unwrap().push(decision);
        });

        store.unsubscribe(id);
        store.set(signed_in(Role::Rider));

        // Only the initial synchronous evaluation was delivered.
        assert_that!(decisions.lock().unwrap().len()).is_equal_to(1);
    }
}
