//! Type-erased observables.
//!
//! `box_it` hides the concrete producer type behind [`BoxObservable`], so
//! streams of different shapes (`of(v)` vs `empty()`, say) can be returned
//! from one mapping closure and merged together.

use crate::prelude::*;

type BoxSubscribe<Item, Err> =
  Box<dyn FnOnce(BoxObserver<Item, Err>, &SharedScheduler) -> SharedSubscription + Send>;

pub struct BoxObservable<Item, Err> {
  subscribe: BoxSubscribe<Item, Err>,
}

impl<Item, Err> BoxObservable<Item, Err> {
  pub(crate) fn new<S>(source: S) -> Self
  where
    S: Observable<Item, Err, BoxObserver<Item, Err>> + Send + 'static,
    S::Unsub: Send + Sync + 'static,
  {
    BoxObservable {
      subscribe: Box::new(move |observer, scheduler| {
        let subscription = SharedSubscription::default();
        subscription.add(source.actual_subscribe(observer, scheduler));
        subscription
      }),
    }
  }
}

impl<Item, Err, O> Observable<Item, Err, O> for BoxObservable<Item, Err>
where
  O: Observer<Item, Err> + Send + 'static,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, observer: O, scheduler: &SharedScheduler) -> Self::Unsub {
    (self.subscribe)(Box::new(observer), scheduler)
  }
}

impl<Item, Err> ObservableExt<Item, Err> for BoxObservable<Item, Err> {}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::test_util::collect;

  #[tokio::test]
  async fn boxing_preserves_the_stream() {
    let source: BoxObservable<i32, std::convert::Infallible> =
      observable::from_iter(0..5).box_it();
    let (values, result) = collect(source).await;
    assert_eq!(values, vec![0, 1, 2, 3, 4]);
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn heterogeneous_sources_unify() {
    let sources: Vec<BoxObservable<i32, std::convert::Infallible>> = vec![
      observable::of(1).box_it(),
      observable::empty::<i32>().box_it(),
      observable::of(3).box_it(),
    ];
    let mut all = Vec::new();
    for source in sources {
      let (values, _) = collect(source).await;
      all.extend(values);
    }
    assert_eq!(all, vec![1, 3]);
  }
}
